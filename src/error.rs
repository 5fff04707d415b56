//! Top-level error type.
//!
//! [`AppError`] gathers the failures of every layer so the front end has one
//! thing to report. API errors already read as user-facing sentences; the
//! rest are translated by [`AppError::user_message`].

use thiserror::Error;

use crate::api::ApiError;
use crate::config::ConfigError;
use crate::storage::StorageError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Api(#[from] ApiError),

    /// Saved credentials could not be read or written.
    #[error("{0}")]
    Storage(#[from] StorageError),

    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl AppError {
    pub fn other(message: impl Into<String>) -> Self {
        AppError::Other(message.into())
    }

    /// Text suitable for showing to the person at the terminal.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Config(e) => config_message(e),
            AppError::Api(e) => e.to_string(),
            AppError::Storage(StorageError::Keyring(_)) => {
                "The OS keyring is unavailable, so the session could not be saved.".to_string()
            }
            AppError::Storage(_) => "Saved credentials could not be read or written.".to_string(),
            AppError::Io(e) => format!("File operation failed: {}", e),
            AppError::Other(message) => message.clone(),
        }
    }

    /// Nothing further can work until the user acts: the session has ended
    /// or the configuration is unusable.
    pub fn is_critical(&self) -> bool {
        matches!(
            self,
            AppError::Config(_) | AppError::Api(ApiError::Unauthorized)
        )
    }

    /// The session is intact and the same operation may succeed if retried.
    pub fn is_recoverable(&self) -> bool {
        match self {
            AppError::Api(e) => matches!(
                e,
                ApiError::Server { .. }
                    | ApiError::Network(_)
                    | ApiError::Validation(_)
                    | ApiError::ExportFailed { .. }
            ),
            _ => false,
        }
    }

    pub fn suggested_action(&self) -> Option<&'static str> {
        match self {
            AppError::Api(ApiError::Unauthorized) => {
                Some("Run 'bradboard login' to start a new session.")
            }
            AppError::Api(ApiError::Network(_)) => {
                Some("Check that the API is reachable, or set BRADBOARD_API_BASE_URL.")
            }
            AppError::Config(ConfigError::ParseError(_) | ConfigError::ValidationError(_)) => {
                Some("Fix or remove the configuration file and try again.")
            }
            AppError::Storage(StorageError::Keyring(_)) => {
                Some("Set credential_backend = \"file\" in the configuration file.")
            }
            _ => None,
        }
    }
}

fn config_message(error: &ConfigError) -> String {
    match error {
        ConfigError::NoConfigDir => "No configuration directory exists on this system.".into(),
        ConfigError::CreateDirError(_) | ConfigError::WriteError(_) => {
            "The configuration file could not be written.".into()
        }
        ConfigError::ReadError(_) => "The configuration file could not be read.".into(),
        ConfigError::ParseError(e) => format!("The configuration file is not valid TOML: {}", e),
        ConfigError::SerializeError(_) => "The configuration could not be encoded.".into(),
        ConfigError::ValidationError(message) => format!("Invalid configuration: {}", message),
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions() {
        let err: AppError = ConfigError::NoConfigDir.into();
        assert!(matches!(err, AppError::Config(ConfigError::NoConfigDir)));

        let err: AppError = ApiError::Unauthorized.into();
        assert!(matches!(err, AppError::Api(ApiError::Unauthorized)));

        let err: AppError = StorageError::Keyring("locked".into()).into();
        assert!(matches!(err, AppError::Storage(StorageError::Keyring(_))));
    }

    #[test]
    fn test_api_text_passes_through() {
        let err = AppError::Api(ApiError::Server {
            status: 404,
            message: "Project not found".to_string(),
        });
        assert_eq!(err.user_message(), "Project not found");
    }

    #[test]
    fn test_config_validation_message_keeps_detail() {
        let err = AppError::Config(ConfigError::ValidationError("page_size must be 1-100".into()));
        assert_eq!(err.user_message(), "Invalid configuration: page_size must be 1-100");
        assert!(err.suggested_action().is_some());
    }

    #[test]
    fn test_ended_session_is_critical() {
        let err = AppError::Api(ApiError::Unauthorized);
        assert!(err.is_critical());
        assert!(!err.is_recoverable());
        assert!(err.suggested_action().unwrap().contains("bradboard login"));
    }

    #[test]
    fn test_server_failure_is_recoverable() {
        let err = AppError::Api(ApiError::ExportFailed { status: 500 });
        assert!(err.is_recoverable());
        assert!(!err.is_critical());
    }

    #[test]
    fn test_plain_message() {
        let err = AppError::other("Nothing to update");
        assert_eq!(err.user_message(), "Nothing to update");
        assert!(err.suggested_action().is_none());
        assert!(!err.is_critical());
    }
}
