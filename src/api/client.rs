//! BradBoard API facade.
//!
//! Maps domain operations onto [`HttpClient`] calls and reshapes server
//! payloads into the entity shapes used everywhere else. The facade holds no
//! state of its own beyond the HTTP client, and never retries or caches.

use serde::de::IgnoredAny;
use tracing::{debug, info, instrument, warn};

use super::error::{ApiError, Result};
use super::http::HttpClient;
use super::types::{
    LoginRequest, Project, ProjectDraft, ProjectList, ProjectUpdate, RegisterRequest,
    SmartCreateRequest, SmartCreateResponse, Ticket, TicketDraft, TicketList, TicketUpdate,
    TokenResponse, User,
};
use crate::storage::REFRESH_TOKEN_KEY;

/// Largest page the list endpoints accept.
pub const MAX_PAGE_SIZE: u32 = 100;

/// The operations the state stores need from the backend.
///
/// [`BradBoardClient`] is the real implementation; stores are generic over
/// this trait so they can run against an in-process fake.
#[allow(async_fn_in_trait)]
pub trait TrackerApi {
    /// Exchange credentials for a session and return the logged-in user.
    async fn login(&self, email: &str, password: &str) -> Result<User>;

    /// Create an account and log into it.
    async fn register(&self, name: &str, email: &str, password: &str) -> Result<User>;

    /// Notify the server that the session is over.
    async fn logout(&self) -> Result<()>;

    /// Renew the token pair using the stored refresh token.
    async fn refresh_session(&self) -> Result<()>;

    /// The user the held token belongs to.
    async fn current_user(&self) -> Result<User>;

    async fn get_projects(&self) -> Result<Vec<Project>>;
    async fn create_project(&self, draft: &ProjectDraft) -> Result<Project>;
    async fn update_project(&self, id: &str, update: &ProjectUpdate) -> Result<Project>;
    async fn delete_project(&self, id: &str) -> Result<()>;

    async fn get_tickets(&self) -> Result<Vec<Ticket>>;
    async fn create_ticket(&self, draft: &TicketDraft) -> Result<Ticket>;
    async fn update_ticket(&self, id: &str, update: &TicketUpdate) -> Result<Ticket>;
    async fn delete_ticket(&self, id: &str) -> Result<()>;

    /// Have the server split free text into tickets under a project.
    async fn create_tickets_from_text(&self, text: &str, project_id: &str) -> Result<Vec<Ticket>>;

    /// Raw CSV of every ticket.
    async fn export_tickets(&self) -> Result<String>;

    async fn get_users(&self) -> Result<Vec<User>>;
}

/// Tunables for [`BradBoardClient`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientOptions {
    /// Items requested per list page.
    pub page_size: u32,
    /// Call `GET /users/` instead of returning an empty user list.
    pub users_endpoint: bool,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            page_size: MAX_PAGE_SIZE,
            users_endpoint: false,
        }
    }
}

/// The BradBoard API client.
#[derive(Debug)]
pub struct BradBoardClient {
    http: HttpClient,
    options: ClientOptions,
}

impl BradBoardClient {
    pub fn new(http: HttpClient) -> Self {
        Self::with_options(http, ClientOptions::default())
    }

    pub fn with_options(http: HttpClient, options: ClientOptions) -> Self {
        let page_size = options.page_size.clamp(1, MAX_PAGE_SIZE);
        Self {
            http,
            options: ClientOptions { page_size, ..options },
        }
    }

    /// The underlying HTTP client.
    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    async fn adopt_tokens_and_fetch_user(&self, tokens: TokenResponse) -> Result<User> {
        self.http
            .set_tokens(&tokens.access_token, &tokens.refresh_token)?;
        // The token body carries no trustworthy user; ask the server who we are.
        self.current_user().await
    }

    /// Collect every page of a list endpoint.
    async fn fetch_all_pages<P, T>(
        &self,
        endpoint: &str,
        into_items: impl Fn(P) -> (Vec<T>, u32),
    ) -> Result<Vec<T>>
    where
        P: serde::de::DeserializeOwned,
    {
        let mut items = Vec::new();
        let mut page = 1u32;

        loop {
            let path = format!(
                "{}?page={}&size={}",
                endpoint, page, self.options.page_size
            );
            let (batch, total) = into_items(self.http.get::<P>(&path).await?);
            let fetched = batch.len();
            items.extend(batch);
            debug!(page, fetched, total, "Fetched list page");

            if fetched == 0 || items.len() as u32 >= total {
                break;
            }
            page += 1;
        }

        Ok(items)
    }
}

impl TrackerApi for BradBoardClient {
    #[instrument(skip(self, password))]
    async fn login(&self, email: &str, password: &str) -> Result<User> {
        let tokens: TokenResponse = self
            .http
            .post("/auth/login", &LoginRequest { email, password })
            .await?;
        let user = self.adopt_tokens_and_fetch_user(tokens).await?;
        info!(user_id = %user.id, "Logged in");
        Ok(user)
    }

    #[instrument(skip(self, password))]
    async fn register(&self, name: &str, email: &str, password: &str) -> Result<User> {
        let tokens: TokenResponse = self
            .http
            .post(
                "/auth/register",
                &RegisterRequest {
                    name,
                    email,
                    password,
                },
            )
            .await?;
        let user = self.adopt_tokens_and_fetch_user(tokens).await?;
        info!(user_id = %user.id, "Registered");
        Ok(user)
    }

    #[instrument(skip(self))]
    async fn logout(&self) -> Result<()> {
        let result = self.http.post_empty::<IgnoredAny>("/auth/logout").await;
        self.http.clear_token();
        if let Err(e) = &result {
            warn!("Server logout failed: {}", e);
        }
        result.map(|_| ())
    }

    #[instrument(skip(self))]
    async fn refresh_session(&self) -> Result<()> {
        let refresh_token = self
            .http
            .storage()
            .get(REFRESH_TOKEN_KEY)
            .ok_or(ApiError::Unauthorized)?;

        let path = format!(
            "/auth/refresh?refresh_token={}",
            urlencoding::encode(&refresh_token)
        );
        let tokens: TokenResponse = self.http.post_empty(&path).await?;
        self.http
            .set_tokens(&tokens.access_token, &tokens.refresh_token)?;

        info!("Session refreshed");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn current_user(&self) -> Result<User> {
        self.http.get("/auth/me").await
    }

    #[instrument(skip(self))]
    async fn get_projects(&self) -> Result<Vec<Project>> {
        self.fetch_all_pages("/projects/", |page: ProjectList| (page.projects, page.total))
            .await
    }

    #[instrument(skip(self, draft))]
    async fn create_project(&self, draft: &ProjectDraft) -> Result<Project> {
        self.http.post("/projects/", draft).await
    }

    #[instrument(skip(self, update))]
    async fn update_project(&self, id: &str, update: &ProjectUpdate) -> Result<Project> {
        self.http.put(&project_path(id), update).await
    }

    #[instrument(skip(self))]
    async fn delete_project(&self, id: &str) -> Result<()> {
        self.http.delete::<IgnoredAny>(&project_path(id)).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_tickets(&self) -> Result<Vec<Ticket>> {
        self.fetch_all_pages("/tickets/", |page: TicketList| {
            let tickets = page
                .tickets
                .into_iter()
                .map(|t| t.into_ticket())
                .collect();
            (tickets, page.total)
        })
        .await
    }

    #[instrument(skip(self, draft))]
    async fn create_ticket(&self, draft: &TicketDraft) -> Result<Ticket> {
        self.http.post("/tickets/", draft).await
    }

    #[instrument(skip(self, update))]
    async fn update_ticket(&self, id: &str, update: &TicketUpdate) -> Result<Ticket> {
        self.http.put(&ticket_path(id), update).await
    }

    #[instrument(skip(self))]
    async fn delete_ticket(&self, id: &str) -> Result<()> {
        self.http.delete::<IgnoredAny>(&ticket_path(id)).await?;
        Ok(())
    }

    #[instrument(skip(self, text), fields(text_len = text.len()))]
    async fn create_tickets_from_text(&self, text: &str, project_id: &str) -> Result<Vec<Ticket>> {
        let response: SmartCreateResponse = self
            .http
            .post("/create", &SmartCreateRequest { text, project_id })
            .await?;
        debug!(
            created = response.created_tickets.len(),
            message = %response.message,
            "Smart create finished"
        );
        Ok(response.created_tickets)
    }

    #[instrument(skip(self))]
    async fn export_tickets(&self) -> Result<String> {
        self.http
            .get_text("/export/tickets/csv")
            .await
            .map_err(|e| match e {
                ApiError::Server { status, message } => {
                    warn!(status, "Export failed: {}", message);
                    ApiError::ExportFailed { status }
                }
                other => other,
            })
    }

    #[instrument(skip(self))]
    async fn get_users(&self) -> Result<Vec<User>> {
        if !self.options.users_endpoint {
            debug!("Users listing disabled, returning an empty list");
            return Ok(Vec::new());
        }
        self.http.get("/users/").await
    }
}

fn project_path(id: &str) -> String {
    format!("/projects/{}", urlencoding::encode(id))
}

fn ticket_path(id: &str) -> String {
    format!("/tickets/{}", urlencoding::encode(id))
}
