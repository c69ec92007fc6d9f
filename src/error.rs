//! Error handling module
//!
//! Centralized error types and HTTP response conversion.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::clients::ClientError;
use crate::domain::ValidationErrors;

/// Application-wide Result type
pub type AppResult<T> = Result<T, AppError>;

/// Coarse classification of a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Lookup found nothing
    NotFound,
    /// Retrying later may succeed
    Transient,
    /// Retrying will fail the same way
    Permanent,
}

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Client errors (4xx)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("Not signed in")]
    Unauthorized,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Email already registered")]
    EmailAlreadyRegistered,

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Bank not found: {0}")]
    BankNotFound(String),

    #[error("Account not found: {0}")]
    AccountNotFound(String),

    // Upstream errors (5xx)
    #[error("No funding source was created for the linked account")]
    FundingSourceMissing,

    #[error("Malformed upstream response: {0}")]
    MalformedUpstream(String),

    #[error(transparent)]
    Upstream(#[from] ClientError),
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::Validation(errors)
    }
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::UserNotFound(_) | AppError::BankNotFound(_) | AppError::AccountNotFound(_) => {
                ErrorKind::NotFound
            }
            AppError::Upstream(e) if e.is_not_found() => ErrorKind::NotFound,
            AppError::Upstream(e) if e.is_transient() => ErrorKind::Transient,
            _ => ErrorKind::Permanent,
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_code, details) = match &self {
            // 400 Bad Request
            AppError::InvalidRequest(msg) => {
                (StatusCode::BAD_REQUEST, "invalid_request", Some(msg.clone()))
            }
            AppError::Validation(errors) => {
                (StatusCode::BAD_REQUEST, "validation_failed", Some(errors.to_string()))
            }

            // 401 Unauthorized
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized", None),
            AppError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "invalid_credentials", None)
            }

            // 404 Not Found
            AppError::UserNotFound(id) => {
                (StatusCode::NOT_FOUND, "user_not_found", Some(id.clone()))
            }
            AppError::BankNotFound(id) => {
                (StatusCode::NOT_FOUND, "bank_not_found", Some(id.clone()))
            }
            AppError::AccountNotFound(id) => {
                (StatusCode::NOT_FOUND, "account_not_found", Some(id.clone()))
            }

            // 409 Conflict
            AppError::EmailAlreadyRegistered => {
                (StatusCode::CONFLICT, "email_already_registered", None)
            }

            // 502 / 503 upstream failures
            AppError::FundingSourceMissing => {
                (StatusCode::BAD_GATEWAY, "funding_source_missing", None)
            }
            AppError::MalformedUpstream(msg) => {
                tracing::error!("Malformed upstream response: {}", msg);
                (StatusCode::BAD_GATEWAY, "malformed_upstream_response", None)
            }
            AppError::Upstream(e) => {
                tracing::error!("Upstream error: {}", e);
                let status = if e.is_transient() {
                    StatusCode::SERVICE_UNAVAILABLE
                } else {
                    StatusCode::BAD_GATEWAY
                };
                (status, "upstream_error", Some(e.service().to_string()))
            }
        };

        // Upstream messages may echo credentials or tokens back
        let error = match &self {
            AppError::Upstream(e) => format!("{} request failed", e.service()),
            other => other.to_string(),
        };

        let body = ErrorResponse {
            error,
            error_code: error_code.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::Service;

    fn upstream(status: u16) -> AppError {
        AppError::Upstream(ClientError::Status {
            service: Service::Plaid,
            status,
            message: "access-sandbox-secret".to_string(),
        })
    }

    #[test]
    fn test_kinds() {
        assert_eq!(AppError::BankNotFound("b".to_string()).kind(), ErrorKind::NotFound);
        assert_eq!(upstream(404).kind(), ErrorKind::NotFound);
        assert_eq!(upstream(500).kind(), ErrorKind::Transient);
        assert_eq!(upstream(400).kind(), ErrorKind::Permanent);
        assert_eq!(AppError::FundingSourceMissing.kind(), ErrorKind::Permanent);
        assert_eq!(AppError::InvalidCredentials.kind(), ErrorKind::Permanent);
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::Unauthorized.into_response().status(), StatusCode::UNAUTHORIZED);
        assert_eq!(upstream(503).into_response().status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(upstream(400).into_response().status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            AppError::EmailAlreadyRegistered.into_response().status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::Validation(ValidationErrors::default()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
    }
}
