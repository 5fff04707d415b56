//! Durable credential storage.
//!
//! The HTTP client and the auth store never touch a concrete backend. They
//! share a [`SharedStorage`] handle to anything implementing
//! [`CredentialStore`], so the session logic can be exercised against
//! [`MemoryStore`] in tests and against [`FileStore`] or [`KeyringStore`] at
//! runtime.

mod file;
mod memory;
mod os_keyring;

use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use tracing::warn;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use os_keyring::KeyringStore;

/// Key holding the serialized current user.
pub const USER_KEY: &str = "user";

/// Key holding the bearer access token.
pub const ACCESS_TOKEN_KEY: &str = "access_token";

/// Key holding the refresh token.
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";

/// Every key the client persists.
pub const SESSION_KEYS: [&str; 3] = [USER_KEY, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY];

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("Storage IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file is not valid JSON.
    #[error("Storage file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    /// The OS keyring rejected the operation.
    #[error("Keyring error: {0}")]
    Keyring(String),

    /// No platform directory is available for the store.
    #[error("Could not determine a data directory for credential storage")]
    NoDataDir,
}

/// A small string key/value capability.
///
/// Removing a key that does not exist is not an error.
pub trait CredentialStore: fmt::Debug + Send + Sync {
    /// Read a value, or `None` when the key is absent or unreadable.
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a value.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Handle shared between the HTTP client and the auth store.
pub type SharedStorage = Arc<dyn CredentialStore>;

/// Remove the token pair and the cached user.
///
/// Failures are logged and skipped so one broken entry cannot keep the others
/// alive.
pub fn purge_session(storage: &dyn CredentialStore) {
    for key in SESSION_KEYS {
        if let Err(e) = storage.remove(key) {
            warn!(key, "Failed to remove stored credential: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_purge_session_removes_all_keys() {
        let store = MemoryStore::new();
        store.set(USER_KEY, "{}").unwrap();
        store.set(ACCESS_TOKEN_KEY, "a").unwrap();
        store.set(REFRESH_TOKEN_KEY, "r").unwrap();
        store.set("unrelated", "x").unwrap();

        purge_session(&store);

        for key in SESSION_KEYS {
            assert!(store.get(key).is_none(), "{} should be gone", key);
        }
        assert_eq!(store.get("unrelated").as_deref(), Some("x"));
    }

    #[test]
    fn test_purge_session_on_empty_store() {
        let store = MemoryStore::new();
        purge_session(&store);
        assert!(store.is_empty());
    }
}
