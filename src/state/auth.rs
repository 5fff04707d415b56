//! Authentication state.
//!
//! Tracks the current user through three phases (unauthenticated, loading,
//! authenticated) and keeps the persisted credential entries in step with
//! them. A stale or rejected token never leaves the store believing it is
//! authenticated.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

use super::failure_message;
use crate::api::{ApiError, Result, TrackerApi, User};
use crate::storage::{purge_session, SharedStorage, ACCESS_TOKEN_KEY, USER_KEY};

/// Fallback message when a failed login carries no text.
const LOGIN_FAILED: &str = "Login failed";

/// Fallback message when a failed registration carries no text.
const REGISTRATION_FAILED: &str = "Registration failed";

/// Snapshot of the authentication state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthState {
    /// The logged-in user, if any.
    pub user: Option<User>,
    /// Whether a transition is in flight.
    pub is_loading: bool,
    /// Message from the last failed transition.
    pub error: Option<String>,
}

/// Coarse phase derived from an [`AuthState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPhase {
    Unauthenticated,
    Loading,
    Authenticated,
}

impl AuthState {
    pub fn phase(&self) -> AuthPhase {
        if self.is_loading {
            AuthPhase::Loading
        } else if self.user.is_some() {
            AuthPhase::Authenticated
        } else {
            AuthPhase::Unauthenticated
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.phase() == AuthPhase::Authenticated
    }
}

/// Owner of the authentication state.
pub struct AuthStore<A> {
    api: Arc<A>,
    storage: SharedStorage,
    state: watch::Sender<AuthState>,
}

impl<A: TrackerApi> AuthStore<A> {
    pub fn new(api: Arc<A>, storage: SharedStorage) -> Self {
        let (state, _) = watch::channel(AuthState::default());
        Self {
            api,
            storage,
            state,
        }
    }

    /// Current snapshot.
    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    /// Receive every future snapshot.
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    /// The logged-in user, if any.
    pub fn current_user(&self) -> Option<User> {
        self.state.borrow().user.clone()
    }

    /// Restore a session left behind by a previous run.
    ///
    /// The stored token is only trusted after the server confirms it. Any
    /// failure purges every stored entry.
    #[instrument(skip(self))]
    pub async fn initialize(&self) {
        let stored_user = self.storage.get(USER_KEY);
        let stored_token = self.storage.get(ACCESS_TOKEN_KEY);

        if stored_user.is_none() || stored_token.is_none() {
            debug!("No stored session");
            self.state.send_modify(|s| s.is_loading = false);
            return;
        }

        self.state.send_modify(|s| {
            s.is_loading = true;
            s.error = None;
        });

        match self.api.current_user().await {
            Ok(user) => {
                info!(user_id = %user.id, "Stored session is still valid");
                self.cache_user(&user);
                self.state.send_replace(AuthState {
                    user: Some(user),
                    is_loading: false,
                    error: None,
                });
            }
            Err(e) => {
                warn!("Stored session rejected, clearing it: {}", e);
                purge_session(self.storage.as_ref());
                self.state.send_replace(AuthState::default());
            }
        }
    }

    /// Log in and remember the user.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        self.begin();
        let result = self.api.login(email, password).await;
        self.finish(result, LOGIN_FAILED)
    }

    /// Create an account and log into it.
    #[instrument(skip(self, password))]
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<User> {
        self.begin();
        let result = self.api.register(name, email, password).await;
        self.finish(result, REGISTRATION_FAILED)
    }

    /// End the session.
    ///
    /// Always ends unauthenticated with no stored credentials, whether or not
    /// the server heard about it.
    #[instrument(skip(self))]
    pub async fn logout(&self) {
        self.state.send_modify(|s| s.is_loading = true);

        if let Err(e) = self.api.logout().await {
            warn!("Logout notification failed, clearing local session anyway: {}", e);
        }

        purge_session(self.storage.as_ref());
        self.state.send_replace(AuthState::default());
        info!("Logged out");
    }

    /// Renew the token pair. The caller decides what a rejection means.
    #[instrument(skip(self))]
    pub async fn refresh_session(&self) -> Result<()> {
        self.api
            .refresh_session()
            .await
            .inspect_err(|e| warn!("Session refresh failed: {}", e))?;
        info!("Session renewed");
        Ok(())
    }

    /// Drop the session after the server rejected our credentials elsewhere.
    pub fn expire(&self) {
        warn!("Session expired");
        purge_session(self.storage.as_ref());
        self.state.send_replace(AuthState {
            user: None,
            is_loading: false,
            error: Some(ApiError::Unauthorized.to_string()),
        });
    }

    fn begin(&self) {
        self.state.send_modify(|s| {
            s.is_loading = true;
            s.error = None;
        });
    }

    fn finish(&self, result: Result<User>, fallback: &str) -> Result<User> {
        match result {
            Ok(user) => {
                self.cache_user(&user);
                self.state.send_replace(AuthState {
                    user: Some(user.clone()),
                    is_loading: false,
                    error: None,
                });
                Ok(user)
            }
            Err(e) => {
                warn!("Authentication failed: {}", e);
                self.state.send_replace(AuthState {
                    user: None,
                    is_loading: false,
                    error: Some(failure_message(&e, fallback)),
                });
                Err(e)
            }
        }
    }

    fn cache_user(&self, user: &User) {
        let result = serde_json::to_string(user)
            .map_err(|e| e.to_string())
            .and_then(|json| self.storage.set(USER_KEY, &json).map_err(|e| e.to_string()));
        if let Err(e) = result {
            warn!("Could not cache user record: {}", e);
        }
    }
}
