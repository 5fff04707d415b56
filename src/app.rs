//! Application object.
//!
//! [`App`] owns the auth and data stores and is handed by reference to the
//! presentation layer. Data operations go through it so that a rejected
//! session anywhere ends the session everywhere.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, instrument};

use crate::api::{
    ApiError, BradBoardClient, ClientOptions, HttpClient, Project, ProjectDraft, ProjectUpdate,
    Ticket, TicketDraft, TicketUpdate, TrackerApi, User,
};
use crate::config::{Config, CredentialBackend};
use crate::error::{AppError, Result};
use crate::state::{AuthState, AuthStore, DataState, DataStore};
use crate::storage::{FileStore, KeyringStore, SharedStorage};

pub struct App<A> {
    auth: AuthStore<A>,
    data: DataStore<A>,
}

impl App<BradBoardClient> {
    /// Build the real client stack from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let settings = &config.settings;

        let storage: SharedStorage = match settings.credential_backend {
            CredentialBackend::File => Arc::new(FileStore::in_data_dir()?),
            CredentialBackend::Keyring => Arc::new(KeyringStore::new()),
        };
        debug!(backend = ?settings.credential_backend, "Credential storage selected");

        let timeout = settings.request_timeout_secs.map(Duration::from_secs);
        let http = HttpClient::with_timeout(&settings.api_base_url, storage.clone(), timeout)?;
        let client = BradBoardClient::with_options(
            http,
            ClientOptions {
                page_size: settings.page_size,
                users_endpoint: settings.users_endpoint,
            },
        );

        Ok(Self::new(Arc::new(client), storage))
    }
}

impl<A: TrackerApi> App<A> {
    pub fn new(api: Arc<A>, storage: SharedStorage) -> Self {
        Self {
            auth: AuthStore::new(api.clone(), storage),
            data: DataStore::new(api),
        }
    }

    pub fn auth(&self) -> &AuthStore<A> {
        &self.auth
    }

    pub fn data(&self) -> &DataStore<A> {
        &self.data
    }

    pub fn auth_state(&self) -> AuthState {
        self.auth.state()
    }

    pub fn data_state(&self) -> DataState {
        self.data.state()
    }

    /// Restore any stored session and, if it is still valid, load data.
    ///
    /// A failed data load is recorded in the data state, not returned.
    #[instrument(skip(self))]
    pub async fn initialize(&self) {
        self.auth.initialize().await;
        if self.auth.state().is_authenticated() {
            let _ = self.refresh_data().await;
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        let user = self.auth.login(email, password).await?;
        self.load_after_login().await?;
        Ok(user)
    }

    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<User> {
        let user = self.auth.register(name, email, password).await?;
        self.load_after_login().await?;
        Ok(user)
    }

    /// A failed first load is kept in the data state, unless the server
    /// already rejected the new session.
    async fn load_after_login(&self) -> Result<()> {
        match self.refresh_data().await {
            Err(e @ AppError::Api(ApiError::Unauthorized)) => Err(e),
            _ => Ok(()),
        }
    }

    /// Swap the stored refresh token for a new pair.
    pub async fn refresh_session(&self) -> Result<()> {
        self.guard(self.auth.refresh_session().await)
    }

    pub async fn logout(&self) {
        self.auth.logout().await;
        self.data.clear();
    }

    /// Fail fast when nobody is logged in.
    pub fn require_user(&self) -> Result<User> {
        self.auth
            .current_user()
            .ok_or(AppError::Api(ApiError::Unauthorized))
    }

    pub async fn refresh_data(&self) -> Result<()> {
        self.guard(self.data.refresh_data().await)
    }

    pub async fn create_project(&self, draft: &ProjectDraft) -> Result<Project> {
        self.guard(self.data.create_project(draft).await)
    }

    pub async fn update_project(&self, id: &str, update: &ProjectUpdate) -> Result<Project> {
        self.guard(self.data.update_project(id, update).await)
    }

    pub async fn delete_project(&self, id: &str) -> Result<()> {
        self.guard(self.data.delete_project(id).await)
    }

    pub async fn create_ticket(&self, draft: &TicketDraft) -> Result<Ticket> {
        self.guard(self.data.create_ticket(draft).await)
    }

    pub async fn update_ticket(&self, id: &str, update: &TicketUpdate) -> Result<Ticket> {
        self.guard(self.data.update_ticket(id, update).await)
    }

    pub async fn delete_ticket(&self, id: &str) -> Result<()> {
        self.guard(self.data.delete_ticket(id).await)
    }

    pub async fn create_tickets_from_text(
        &self,
        text: &str,
        project_id: &str,
    ) -> Result<Vec<Ticket>> {
        self.guard(self.data.create_tickets_from_text(text, project_id).await)
    }

    pub async fn export_tickets(&self, dir: &Path) -> Result<PathBuf> {
        let result = self.data.export_tickets(dir).await;
        if let Err(AppError::Api(ApiError::Unauthorized)) = &result {
            self.end_session();
        }
        result
    }

    fn guard<T>(&self, result: crate::api::Result<T>) -> Result<T> {
        result.map_err(|e| {
            if e.is_session_ended() {
                self.end_session();
            }
            AppError::Api(e)
        })
    }

    fn end_session(&self) {
        info!("Server rejected the session");
        self.auth.expire();
        self.data.clear();
    }
}
