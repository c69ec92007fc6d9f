//! API Routes
//!
//! HTTP endpoint definitions.

use axum::{
    extract::{rejection::QueryRejection, Extension, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};

use crate::domain::{
    Account, AccountsSummary, BankAccount, LinkToken, Page, SignInParams, SignUpParams,
    Transaction, User,
};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

use super::middleware::CurrentUser;
use super::session::{removal_cookie, session_cookie, session_secret};

// =========================================================================
// Request/Response types
// =========================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct ExchangeRequest {
    pub public_token: String,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    /// Bank record id; defaults to the user's first bank
    #[serde(default)]
    pub id: Option<String>,
    /// 1-based; zero and negative pages are empty
    #[serde(default = "default_page")]
    pub page: i64,
}

fn default_page() -> i64 {
    1
}

#[derive(Debug, Serialize)]
pub struct TransactionHistoryResponse {
    pub account: Account,
    pub transactions: Page<Transaction>,
}

// =========================================================================
// API Routers
// =========================================================================

/// Routes that work without a session
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/sign-up", post(sign_up))
        .route("/auth/sign-in", post(sign_in))
        .route("/auth/logout", post(logout))
}

/// Routes that require a session cookie
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(me))
        .route("/banks", get(list_banks))
        .route("/banks/link-token", post(create_link_token))
        .route("/banks/exchange", post(exchange_public_token))
        .route("/banks/by-account/:account_id", get(get_bank_by_account))
        .route("/banks/:document_id", get(get_bank))
        .route("/accounts", get(get_accounts))
        .route("/transaction-history", get(transaction_history))
}

// =========================================================================
// Auth
// =========================================================================

/// Register, open a session and set the session cookie
async fn sign_up(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(params): Json<SignUpParams>,
) -> AppResult<(StatusCode, CookieJar, Json<User>)> {
    let signed_in = state.users.sign_up(params).await?;

    Ok((
        StatusCode::CREATED,
        jar.add(session_cookie(signed_in.session.secret)),
        Json(signed_in.user),
    ))
}

/// Open a session and set the session cookie
async fn sign_in(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(params): Json<SignInParams>,
) -> AppResult<(CookieJar, Json<User>)> {
    let signed_in = state.users.sign_in(params).await?;

    Ok((
        jar.add(session_cookie(signed_in.session.secret)),
        Json(signed_in.user),
    ))
}

/// End the session. The cookie is removed even when the upstream call fails.
async fn logout(State(state): State<AppState>, jar: CookieJar) -> Response {
    let secret = session_secret(&jar);
    let result = state.users.logout(secret.as_deref()).await;
    let jar = jar.remove(removal_cookie());

    match result {
        Ok(()) => (jar, StatusCode::NO_CONTENT).into_response(),
        Err(e) => (jar, e).into_response(),
    }
}

async fn me(Extension(current): Extension<CurrentUser>) -> Json<User> {
    Json(current.user)
}

// =========================================================================
// Banks
// =========================================================================

async fn create_link_token(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> AppResult<Json<LinkToken>> {
    let token = state.banks.create_link_token(&current.user).await?;
    Ok(Json(token))
}

async fn exchange_public_token(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(request): Json<ExchangeRequest>,
) -> AppResult<(StatusCode, Json<BankAccount>)> {
    if request.public_token.trim().is_empty() {
        return Err(AppError::InvalidRequest("public_token is required".to_string()));
    }

    let bank = state
        .banks
        .exchange_public_token(&current.user, &request.public_token)
        .await?;

    Ok((StatusCode::CREATED, Json(bank)))
}

async fn list_banks(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> AppResult<Json<Vec<BankAccount>>> {
    let banks = state.banks.get_banks(&current.user.id).await?;
    Ok(Json(banks))
}

/// Records of other users read as missing
fn owned_by(bank: Option<BankAccount>, user: &User, id: &str) -> AppResult<BankAccount> {
    bank.filter(|b| b.user_id == user.id)
        .ok_or_else(|| AppError::BankNotFound(id.to_string()))
}

async fn get_bank(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(document_id): Path<String>,
) -> AppResult<Json<BankAccount>> {
    let bank = state.banks.get_bank(&document_id).await?;
    Ok(Json(owned_by(bank, &current.user, &document_id)?))
}

async fn get_bank_by_account(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(account_id): Path<String>,
) -> AppResult<Json<BankAccount>> {
    let bank = state.banks.get_bank_by_account_id(&account_id).await?;
    Ok(Json(owned_by(bank, &current.user, &account_id)?))
}

// =========================================================================
// Accounts
// =========================================================================

/// Home dashboard
async fn get_accounts(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> AppResult<Json<AccountsSummary>> {
    let summary = state.banks.get_accounts(&current.user.id).await?;
    Ok(Json(summary))
}

/// One page of an account's transactions
async fn transaction_history(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> AppResult<Json<TransactionHistoryResponse>> {
    let Query(query) = query.map_err(|e| AppError::InvalidRequest(e.body_text()))?;

    let bank = match query.id {
        Some(ref id) => owned_by(state.banks.get_bank(id).await?, &current.user, id)?,
        None => state
            .banks
            .get_banks(&current.user.id)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::BankNotFound(current.user.id.clone()))?,
    };

    let detail = state.banks.get_account(&bank).await?;

    Ok(Json(TransactionHistoryResponse {
        transactions: Page::from_slice(
            &detail.transactions,
            usize::try_from(query.page).unwrap_or(0),
        ),
        account: detail.account,
    }))
}
