//! API error types for the BradBoard client.

use reqwest::StatusCode;
use thiserror::Error;

use crate::storage::StorageError;

/// Errors that can occur when talking to the BradBoard API.
///
/// Every failure from the HTTP layer is normalized into one of these variants,
/// and each carries a message fit for showing to a user.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered 401. The session is over and stored credentials
    /// have been cleared.
    #[error("Authentication required. Please log in again.")]
    Unauthorized,

    /// Any other non-2xx answer.
    #[error("{message}")]
    Server { status: u16, message: String },

    /// The request never produced a response.
    #[error("Network error. Please check your connection and try again.")]
    Network(#[source] reqwest::Error),

    /// The response body could not be decoded.
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    /// Rejected client-side before any request was sent.
    #[error("{0}")]
    Validation(String),

    /// The CSV export endpoint failed.
    #[error("Failed to export tickets")]
    ExportFailed { status: u16 },

    /// Credentials could not be persisted.
    #[error("{0}")]
    Storage(#[from] StorageError),
}

/// Result type for API operations.
pub type Result<T> = std::result::Result<T, ApiError>;

impl ApiError {
    /// Build an error for a non-2xx status with an optional server message.
    ///
    /// The server message wins when present; otherwise the status line is used.
    pub fn from_status(status: StatusCode, detail: Option<String>) -> Self {
        if status == StatusCode::UNAUTHORIZED {
            return ApiError::Unauthorized;
        }
        let message = detail.unwrap_or_else(|| {
            format!(
                "HTTP {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown Status")
            )
        });
        ApiError::Server {
            status: status.as_u16(),
            message,
        }
    }

    /// True when the session has ended and the user must log in again.
    pub fn is_session_ended(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }

    /// HTTP status associated with the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized => Some(401),
            ApiError::Server { status, .. } | ApiError::ExportFailed { status } => Some(*status),
            _ => None,
        }
    }
}
