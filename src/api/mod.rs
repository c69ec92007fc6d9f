//! API module
//!
//! HTTP endpoints, session handling and middleware.

pub mod middleware;
pub mod routes;
pub mod session;

use axum::{middleware as axum_middleware, routing::get, Router};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the application router
pub fn app(state: AppState) -> Router {
    // Axum layers run in reverse order (last added = first executed)
    let protected = routes::protected_routes().layer(axum_middleware::from_fn_with_state(
        state.clone(),
        middleware::session_middleware,
    ));

    let api = routes::auth_routes()
        .merge(protected)
        .layer(axum_middleware::from_fn(middleware::logging_middleware));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
