//! Configuration management for BradBoard.
//!
//! Settings live in `config.toml` under the platform configuration directory:
//! - Linux: `~/.config/bradboard/config.toml`
//! - macOS: `~/Library/Application Support/bradboard/config.toml`
//! - Windows: `C:\Users\<User>\AppData\Roaming\bradboard\config.toml`
//!
//! A missing file means defaults. The `BRADBOARD_API_BASE_URL` environment
//! variable overrides the API URL from the file.

mod settings;

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

pub use settings::{CredentialBackend, Settings};

/// Environment variable overriding the API base URL.
pub const BASE_URL_ENV: &str = "BRADBOARD_API_BASE_URL";

const CONFIG_FILE: &str = "config.toml";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine the configuration directory")]
    NoConfigDir,

    #[error("failed to create configuration directory: {0}")]
    CreateDirError(std::io::Error),

    #[error("failed to read configuration file: {0}")]
    ReadError(std::io::Error),

    #[error("failed to write configuration file: {0}")]
    WriteError(std::io::Error),

    #[error("failed to parse configuration file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("failed to serialize configuration: {0}")]
    SerializeError(#[from] toml::ser::Error),

    #[error("{0}")]
    ValidationError(String),
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Loaded configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub settings: Settings,
}

impl Config {
    /// Path of the default configuration file.
    pub fn config_path() -> Result<PathBuf> {
        let dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(dir.join("bradboard").join(CONFIG_FILE))
    }

    /// Load from the default location, applying environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        config.apply_env_overrides();
        config.settings.validate()?;
        Ok(config)
    }

    /// Load from an explicit path. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        let config = Self::read_from(path)?;
        config.settings.validate()?;
        Ok(config)
    }

    /// Parse a file without validating it, so bad values can be corrected.
    pub fn read_from(path: &Path) -> Result<Self> {
        let settings = match fs::read_to_string(path) {
            Ok(contents) => {
                debug!(path = %path.display(), "Loading configuration");
                toml::from_str::<Settings>(&contents)?
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No configuration file, using defaults");
                Settings::default()
            }
            Err(e) => return Err(ConfigError::ReadError(e)),
        };

        Ok(Self { settings })
    }

    /// Write to an explicit path, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.settings.validate()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(ConfigError::CreateDirError)?;
        }
        let contents = toml::to_string_pretty(&self.settings)?;
        fs::write(path, contents).map_err(ConfigError::WriteError)?;
        info!(path = %path.display(), "Configuration saved");
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            if !url.trim().is_empty() {
                debug!("API base URL overridden from environment");
                self.settings.api_base_url = url.trim().to_string();
            }
        }
    }
}
