//! Bearer credential handling.
//!
//! The access token lives in memory inside [`Auth`] and is mirrored into
//! durable storage so a restarted client can resume the session.

use crate::storage::{
    purge_session, CredentialStore, StorageError, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY,
};

/// The bearer credential attached to authenticated requests.
#[derive(Clone, Default)]
pub struct Auth {
    /// The complete "Bearer ..." header value.
    auth_header: Option<String>,
}

impl Auth {
    /// Credential for an access token.
    pub fn bearer(token: &str) -> Self {
        Self {
            auth_header: Some(build_auth_header(token)),
        }
    }

    /// Resume from whatever access token storage holds.
    pub fn from_storage(storage: &dyn CredentialStore) -> Self {
        storage
            .get(ACCESS_TOKEN_KEY)
            .filter(|token| !token.is_empty())
            .map(|token| Self::bearer(&token))
            .unwrap_or_default()
    }

    /// The `Authorization` header value, if a token is held.
    pub fn header_value(&self) -> Option<&str> {
        self.auth_header.as_deref()
    }

    /// True when a token is held.
    pub fn is_present(&self) -> bool {
        self.auth_header.is_some()
    }
}

impl std::fmt::Debug for Auth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Auth")
            .field("token", &self.auth_header.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

fn build_auth_header(token: &str) -> String {
    format!("Bearer {}", token)
}

/// Persist a freshly issued token pair.
pub fn store_tokens(
    storage: &dyn CredentialStore,
    access_token: &str,
    refresh_token: &str,
) -> Result<(), StorageError> {
    storage.set(ACCESS_TOKEN_KEY, access_token)?;
    storage.set(REFRESH_TOKEN_KEY, refresh_token)?;
    Ok(())
}

/// Remove the token pair and the cached user.
pub fn clear_tokens(storage: &dyn CredentialStore) {
    purge_session(storage);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, USER_KEY};

    #[test]
    fn test_bearer_header() {
        let auth = Auth::bearer("abc.def");
        assert_eq!(auth.header_value(), Some("Bearer abc.def"));
        assert!(auth.is_present());
    }

    #[test]
    fn test_default_has_no_header() {
        assert!(Auth::default().header_value().is_none());
    }

    #[test]
    fn test_from_storage() {
        let store = MemoryStore::new();
        assert!(!Auth::from_storage(&store).is_present());

        store.set(ACCESS_TOKEN_KEY, "").unwrap();
        assert!(!Auth::from_storage(&store).is_present());

        store.set(ACCESS_TOKEN_KEY, "tok").unwrap();
        assert_eq!(
            Auth::from_storage(&store).header_value(),
            Some("Bearer tok")
        );
    }

    #[test]
    fn test_store_and_clear_tokens() {
        let store = MemoryStore::new();
        store_tokens(&store, "access", "refresh").unwrap();
        store.set(USER_KEY, "{}").unwrap();
        assert_eq!(store.get(REFRESH_TOKEN_KEY).as_deref(), Some("refresh"));

        clear_tokens(&store);
        assert!(store.is_empty());
    }

    #[test]
    fn test_auth_does_not_expose_token() {
        let auth = Auth::bearer("secret_token");
        let debug_output = format!("{:?}", auth);
        assert!(!debug_output.contains("secret_token"));
    }
}
