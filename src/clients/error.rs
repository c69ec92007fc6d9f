//! Client Error Types
//!
//! Failures of calls to the hosted services, tagged with the service that
//! produced them.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Hosted service a client talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    Appwrite,
    Plaid,
    Dwolla,
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Service::Appwrite => write!(f, "appwrite"),
            Service::Plaid => write!(f, "plaid"),
            Service::Dwolla => write!(f, "dwolla"),
        }
    }
}

/// Errors returned by the service clients
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClientError {
    /// Request never produced a response
    #[error("{service} request failed: {message}")]
    Transport { service: Service, message: String },

    /// Service answered with a non-success status
    #[error("{service} returned status {status}: {message}")]
    Status {
        service: Service,
        status: u16,
        message: String,
    },

    /// Request body could not be serialized
    #[error("{service} request could not be encoded: {message}")]
    Encode { service: Service, message: String },

    /// Response body did not have the expected shape
    #[error("{service} response could not be decoded: {message}")]
    Decode { service: Service, message: String },

    /// Response lacked a field the contract requires
    #[error("{service} response missing {field}")]
    MissingField {
        service: Service,
        field: &'static str,
    },
}

impl ClientError {
    pub fn service(&self) -> Service {
        match self {
            Self::Transport { service, .. }
            | Self::Status { service, .. }
            | Self::Encode { service, .. }
            | Self::Decode { service, .. }
            | Self::MissingField { service, .. } => *service,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    pub fn is_conflict(&self) -> bool {
        self.status() == Some(409)
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401) | Some(403))
    }

    /// Failures that may succeed if the user tries again later
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport { .. } => true,
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    pub(crate) fn transport(service: Service, err: reqwest::Error) -> Self {
        tracing::error!(%service, "Error occurred in request: {:#?}", err);
        Self::Transport {
            service,
            message: err.to_string(),
        }
    }
}

/// Serialize a request body to JSON
pub(crate) fn encode<T: Serialize>(service: Service, body: &T) -> Result<Value, ClientError> {
    serde_json::to_value(body).map_err(|err| {
        tracing::error!(%service, "Error occurred while serialising request: {:#?}", err);
        ClientError::Encode {
            service,
            message: err.to_string(),
        }
    })
}

/// Turn a non-success response into `ClientError::Status`
pub(crate) async fn check_status(
    service: Service,
    response: reqwest::Response,
) -> Result<reqwest::Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response.text().await.unwrap_or_default();
    tracing::error!(%service, status = status.as_u16(), "Upstream returned error: {}", message);

    Err(ClientError::Status {
        service,
        status: status.as_u16(),
        message,
    })
}

/// Check the status, then deserialize the JSON body
pub(crate) async fn decode<T: DeserializeOwned>(
    service: Service,
    response: reqwest::Response,
) -> Result<T, ClientError> {
    check_status(service, response)
        .await?
        .json::<T>()
        .await
        .map_err(|err| {
            tracing::error!(%service, "Error occurred while deserialising response: {:#?}", err);
            ClientError::Decode {
                service,
                message: err.to_string(),
            }
        })
}
