//! Application settings configuration.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{ConfigError, Result};
use crate::api::client::MAX_PAGE_SIZE;
use crate::api::DEFAULT_BASE_URL;

/// Where session credentials are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialBackend {
    /// A JSON file in the local data directory.
    #[default]
    File,
    /// The OS keyring.
    Keyring,
}

impl FromStr for CredentialBackend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "file" => Ok(CredentialBackend::File),
            "keyring" => Ok(CredentialBackend::Keyring),
            other => Err(format!(
                "unknown credential backend '{}' (expected file or keyring)",
                other
            )),
        }
    }
}

/// Application-wide settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Base URL of the BradBoard API, including the version prefix.
    pub api_base_url: String,
    /// Where tokens and the cached user are stored.
    pub credential_backend: CredentialBackend,
    /// Whether the server's `/users/` listing is available.
    pub users_endpoint: bool,
    /// Items requested per list page.
    pub page_size: u32,
    /// Per-request timeout. Unset means requests may wait forever.
    pub request_timeout_secs: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_BASE_URL.to_string(),
            credential_backend: CredentialBackend::File,
            users_endpoint: false,
            page_size: MAX_PAGE_SIZE,
            request_timeout_secs: None,
        }
    }
}

impl Settings {
    /// Validate these settings.
    ///
    /// Checks that:
    /// - The API URL is non-empty and uses http:// or https://
    /// - The page size is within what the server accepts
    /// - A timeout, when set, is non-zero
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError::ValidationError` with details if validation fails.
    pub fn validate(&self) -> Result<()> {
        if self.api_base_url.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "api_base_url cannot be empty".to_string(),
            ));
        }

        if !self.api_base_url.starts_with("https://") && !self.api_base_url.starts_with("http://")
        {
            return Err(ConfigError::ValidationError(format!(
                "api_base_url '{}' must start with http:// or https://",
                self.api_base_url
            )));
        }

        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(ConfigError::ValidationError(format!(
                "page_size must be between 1 and {}, got {}",
                MAX_PAGE_SIZE, self.page_size
            )));
        }

        if self.request_timeout_secs == Some(0) {
            return Err(ConfigError::ValidationError(
                "request_timeout_secs must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}
