//! Project, ticket, and user collections.
//!
//! Every mutation waits for the server before touching local state. On
//! success the collections are reconciled by identifier: insert for create,
//! replace in place for update, filter out for delete. On failure the error is
//! handed back untouched and nothing local changes.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::watch;
use tracing::{error, info, instrument, warn};

use super::failure_message;
use crate::api::{
    Project, ProjectDraft, ProjectUpdate, Result, Ticket, TicketDraft, TicketUpdate, TrackerApi,
    User,
};
use crate::error::AppError;

/// Fallback message when a refresh fails without text.
const LOAD_FAILED: &str = "Failed to load data";

/// Snapshot of the data collections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataState {
    pub projects: Vec<Project>,
    pub tickets: Vec<Ticket>,
    pub users: Vec<User>,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl DataState {
    pub fn project(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    pub fn ticket(&self, id: &str) -> Option<&Ticket> {
        self.tickets.iter().find(|t| t.id == id)
    }
}

/// Owner of the in-memory collections.
pub struct DataStore<A> {
    api: Arc<A>,
    state: watch::Sender<DataState>,
}

impl<A: TrackerApi> DataStore<A> {
    pub fn new(api: Arc<A>) -> Self {
        let (state, _) = watch::channel(DataState::default());
        Self { api, state }
    }

    /// Current snapshot.
    pub fn state(&self) -> DataState {
        self.state.borrow().clone()
    }

    /// Receive every future snapshot.
    pub fn subscribe(&self) -> watch::Receiver<DataState> {
        self.state.subscribe()
    }

    /// Forget everything, e.g. after the session ends.
    pub fn clear(&self) {
        self.state.send_replace(DataState::default());
    }

    /// Reload projects, tickets, and users together.
    ///
    /// The three fetches run concurrently. Results are adopted only when all
    /// three succeed; otherwise every collection keeps its previous contents
    /// and the error is recorded.
    #[instrument(skip(self))]
    pub async fn refresh_data(&self) -> Result<()> {
        self.state.send_modify(|s| {
            s.is_loading = true;
            s.error = None;
        });

        let fetched = tokio::try_join!(
            self.api.get_projects(),
            self.api.get_tickets(),
            self.api.get_users()
        );

        match fetched {
            Ok((projects, tickets, users)) => {
                info!(
                    projects = projects.len(),
                    tickets = tickets.len(),
                    users = users.len(),
                    "Data refreshed"
                );
                self.state.send_replace(DataState {
                    projects,
                    tickets,
                    users,
                    is_loading: false,
                    error: None,
                });
                Ok(())
            }
            Err(e) => {
                error!("Refresh failed: {}", e);
                let message = failure_message(&e, LOAD_FAILED);
                self.state.send_modify(|s| {
                    s.is_loading = false;
                    s.error = Some(message);
                });
                Err(e)
            }
        }
    }

    #[instrument(skip(self, draft))]
    pub async fn create_project(&self, draft: &ProjectDraft) -> Result<Project> {
        draft.validate()?;
        let project = self
            .api
            .create_project(draft)
            .await
            .inspect_err(|e| warn!("Create project failed: {}", e))?;

        info!(project_id = %project.id, "Project created");
        let added = project.clone();
        self.state.send_modify(|s| s.projects.push(added));
        Ok(project)
    }

    #[instrument(skip(self, update))]
    pub async fn update_project(&self, id: &str, update: &ProjectUpdate) -> Result<Project> {
        update.validate()?;
        let project = self
            .api
            .update_project(id, update)
            .await
            .inspect_err(|e| warn!("Update project failed: {}", e))?;

        info!("Project updated");
        let replacement = project.clone();
        self.state.send_modify(|s| {
            if let Some(slot) = s.projects.iter_mut().find(|p| p.id == id) {
                *slot = replacement;
            }
        });
        Ok(project)
    }

    /// Delete a project and drop its tickets from local state.
    #[instrument(skip(self))]
    pub async fn delete_project(&self, id: &str) -> Result<()> {
        self.api
            .delete_project(id)
            .await
            .inspect_err(|e| warn!("Delete project failed: {}", e))?;

        self.state.send_modify(|s| {
            s.projects.retain(|p| p.id != id);
            let before = s.tickets.len();
            s.tickets.retain(|t| t.project_id != id);
            info!(dropped_tickets = before - s.tickets.len(), "Project deleted");
        });
        Ok(())
    }

    #[instrument(skip(self, draft))]
    pub async fn create_ticket(&self, draft: &TicketDraft) -> Result<Ticket> {
        draft.validate()?;
        let ticket = self
            .api
            .create_ticket(draft)
            .await
            .inspect_err(|e| warn!("Create ticket failed: {}", e))?;

        info!(ticket_id = %ticket.id, "Ticket created");
        let added = ticket.clone();
        self.state.send_modify(|s| s.tickets.push(added));
        Ok(ticket)
    }

    #[instrument(skip(self, update))]
    pub async fn update_ticket(&self, id: &str, update: &TicketUpdate) -> Result<Ticket> {
        update.validate()?;
        let ticket = self
            .api
            .update_ticket(id, update)
            .await
            .inspect_err(|e| warn!("Update ticket failed: {}", e))?;

        info!("Ticket updated");
        let replacement = ticket.clone();
        self.state.send_modify(|s| {
            if let Some(slot) = s.tickets.iter_mut().find(|t| t.id == id) {
                *slot = replacement;
            }
        });
        Ok(ticket)
    }

    #[instrument(skip(self))]
    pub async fn delete_ticket(&self, id: &str) -> Result<()> {
        self.api
            .delete_ticket(id)
            .await
            .inspect_err(|e| warn!("Delete ticket failed: {}", e))?;

        info!("Ticket deleted");
        self.state.send_modify(|s| s.tickets.retain(|t| t.id != id));
        Ok(())
    }

    /// Have the server split `text` into tickets and add them locally.
    #[instrument(skip(self, text))]
    pub async fn create_tickets_from_text(
        &self,
        text: &str,
        project_id: &str,
    ) -> Result<Vec<Ticket>> {
        let tickets = self
            .api
            .create_tickets_from_text(text, project_id)
            .await
            .inspect_err(|e| warn!("Smart create failed: {}", e))?;

        info!(created = tickets.len(), "Tickets created from text");
        let added = tickets.clone();
        self.state.send_modify(|s| s.tickets.extend(added));
        Ok(tickets)
    }

    /// Download the CSV export into `dir` as `tickets-<date>.csv`.
    #[instrument(skip(self, dir), fields(dir = %dir.display()))]
    pub async fn export_tickets(&self, dir: &Path) -> std::result::Result<PathBuf, AppError> {
        let csv = self
            .api
            .export_tickets()
            .await
            .inspect_err(|e| warn!("Export failed: {}", e))?;

        let path = dir.join(export_file_name());
        tokio::fs::create_dir_all(dir).await?;
        tokio::fs::write(&path, csv).await?;

        info!(path = %path.display(), "Tickets exported");
        Ok(path)
    }
}

/// `tickets-<YYYY-MM-DD>.csv` for today's UTC date.
pub fn export_file_name() -> String {
    format!("tickets-{}.csv", Utc::now().format("%Y-%m-%d"))
}
