//! In-process stand-in for the BradBoard backend, used by store tests.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::api::{
    ApiError, Priority, Project, ProjectDraft, ProjectUpdate, Result, Status, Ticket, TicketDraft,
    TicketUpdate, TrackerApi, User,
};

const TIMESTAMP: &str = "2024-05-01T10:00:00+00:00";

pub(crate) fn user(id: &str, name: &str) -> User {
    User {
        id: id.to_string(),
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
    }
}

pub(crate) fn project(id: &str, title: &str) -> Project {
    Project {
        id: id.to_string(),
        title: title.to_string(),
        description: String::new(),
        created_by_id: "u1".to_string(),
        created_by_name: "Brad".to_string(),
        created_at: TIMESTAMP.to_string(),
        updated_at: TIMESTAMP.to_string(),
    }
}

pub(crate) fn ticket(id: &str, project_id: &str, title: &str) -> Ticket {
    Ticket {
        id: id.to_string(),
        project_id: project_id.to_string(),
        title: title.to_string(),
        description: String::new(),
        created_by_id: "u1".to_string(),
        created_by_name: "Brad".to_string(),
        status: Status::Open,
        priority: Priority::Medium,
        assigned_to_id: None,
        assigned_to_name: None,
        created_at: TIMESTAMP.to_string(),
        updated_at: TIMESTAMP.to_string(),
    }
}

enum Failure {
    Message(String),
    Unauthorized,
}

#[derive(Default)]
struct Backend {
    me: Option<User>,
    projects: Vec<Project>,
    tickets: Vec<Ticket>,
    users: Vec<User>,
    csv: String,
    failures: HashMap<&'static str, Failure>,
    calls: Vec<&'static str>,
    sent_updates: Vec<serde_json::Value>,
    next_id: u32,
}

/// A scripted [`TrackerApi`].
///
/// Operations succeed against in-memory collections unless told to fail with
/// [`FakeApi::fail`] or [`FakeApi::fail_unauthorized`].
#[derive(Default)]
pub(crate) struct FakeApi {
    backend: Mutex<Backend>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(self, user: User) -> Self {
        self.backend.lock().unwrap().me = Some(user);
        self
    }

    pub fn with_projects(self, projects: Vec<Project>) -> Self {
        self.backend.lock().unwrap().projects = projects;
        self
    }

    pub fn with_tickets(self, tickets: Vec<Ticket>) -> Self {
        self.backend.lock().unwrap().tickets = tickets;
        self
    }

    pub fn with_users(self, users: Vec<User>) -> Self {
        self.backend.lock().unwrap().users = users;
        self
    }

    pub fn with_csv(self, csv: &str) -> Self {
        self.backend.lock().unwrap().csv = csv.to_string();
        self
    }

    /// Make `operation` fail with a server message.
    pub fn fail(&self, operation: &'static str, message: &str) {
        self.backend
            .lock()
            .unwrap()
            .failures
            .insert(operation, Failure::Message(message.to_string()));
    }

    /// Make `operation` fail as if the server answered 401.
    pub fn fail_unauthorized(&self, operation: &'static str) {
        self.backend
            .lock()
            .unwrap()
            .failures
            .insert(operation, Failure::Unauthorized);
    }

    /// Let `operation` succeed again.
    pub fn heal(&self, operation: &'static str) {
        self.backend.lock().unwrap().failures.remove(operation);
    }

    /// Operations invoked so far, in order.
    pub fn calls(&self) -> Vec<&'static str> {
        self.backend.lock().unwrap().calls.clone()
    }

    /// JSON bodies of every update, as they would go over the wire.
    pub fn sent_updates(&self) -> Vec<serde_json::Value> {
        self.backend.lock().unwrap().sent_updates.clone()
    }

    fn enter(&self, operation: &'static str) -> Result<std::sync::MutexGuard<'_, Backend>> {
        let mut backend = self.backend.lock().unwrap();
        backend.calls.push(operation);
        let failure = match backend.failures.get(operation) {
            Some(Failure::Message(message)) => Some(ApiError::Server {
                status: 400,
                message: message.clone(),
            }),
            Some(Failure::Unauthorized) => Some(ApiError::Unauthorized),
            None => None,
        };
        match failure {
            Some(error) => Err(error),
            None => Ok(backend),
        }
    }
}

impl Backend {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}-new-{}", prefix, self.next_id)
    }

    fn me(&self) -> Result<User> {
        self.me.clone().ok_or(ApiError::Unauthorized)
    }
}

fn not_found(kind: &str) -> ApiError {
    ApiError::Server {
        status: 404,
        message: format!("{} not found", kind),
    }
}

impl TrackerApi for FakeApi {
    async fn login(&self, _email: &str, _password: &str) -> Result<User> {
        self.enter("login")?.me()
    }

    async fn register(&self, name: &str, email: &str, _password: &str) -> Result<User> {
        let mut backend = self.enter("register")?;
        let user = User {
            id: backend.next_id("u"),
            name: name.to_string(),
            email: email.to_string(),
        };
        backend.me = Some(user.clone());
        Ok(user)
    }

    async fn logout(&self) -> Result<()> {
        drop(self.enter("logout")?);
        Ok(())
    }

    async fn refresh_session(&self) -> Result<()> {
        drop(self.enter("refresh_session")?);
        Ok(())
    }

    async fn current_user(&self) -> Result<User> {
        self.enter("current_user")?.me()
    }

    async fn get_projects(&self) -> Result<Vec<Project>> {
        Ok(self.enter("get_projects")?.projects.clone())
    }

    async fn create_project(&self, draft: &ProjectDraft) -> Result<Project> {
        let mut backend = self.enter("create_project")?;
        let mut created = project(&backend.next_id("p"), &draft.title);
        created.description = draft.description.clone();
        backend.projects.push(created.clone());
        Ok(created)
    }

    async fn update_project(&self, id: &str, update: &ProjectUpdate) -> Result<Project> {
        let mut backend = self.enter("update_project")?;
        backend.sent_updates.push(serde_json::to_value(update).unwrap());
        let existing = backend
            .projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| not_found("Project"))?;
        if let Some(title) = &update.title {
            existing.title = title.clone();
        }
        if let Some(description) = &update.description {
            existing.description = description.clone();
        }
        existing.updated_at = "2024-06-01T10:00:00+00:00".to_string();
        Ok(existing.clone())
    }

    async fn delete_project(&self, id: &str) -> Result<()> {
        let mut backend = self.enter("delete_project")?;
        let before = backend.projects.len();
        backend.projects.retain(|p| p.id != id);
        if backend.projects.len() == before {
            return Err(not_found("Project"));
        }
        Ok(())
    }

    async fn get_tickets(&self) -> Result<Vec<Ticket>> {
        Ok(self.enter("get_tickets")?.tickets.clone())
    }

    async fn create_ticket(&self, draft: &TicketDraft) -> Result<Ticket> {
        let mut backend = self.enter("create_ticket")?;
        let mut created = ticket(&backend.next_id("t"), &draft.project_id, &draft.title);
        created.description = draft.description.clone();
        created.status = draft.status;
        created.priority = draft.priority;
        created.assigned_to_id = draft.assigned_to_id.clone();
        created.assigned_to_name = draft.assigned_to_name.clone();
        backend.tickets.push(created.clone());
        Ok(created)
    }

    async fn update_ticket(&self, id: &str, update: &TicketUpdate) -> Result<Ticket> {
        let mut backend = self.enter("update_ticket")?;
        backend.sent_updates.push(serde_json::to_value(update).unwrap());
        let existing = backend
            .tickets
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| not_found("Ticket"))?;
        if let Some(v) = &update.project_id {
            existing.project_id = v.clone();
        }
        if let Some(v) = &update.title {
            existing.title = v.clone();
        }
        if let Some(v) = &update.description {
            existing.description = v.clone();
        }
        if let Some(v) = update.status {
            existing.status = v;
        }
        if let Some(v) = update.priority {
            existing.priority = v;
        }
        if update.assigned_to_id.is_some() {
            existing.assigned_to_id = update.assigned_to_id.clone();
            existing.assigned_to_name = update.assigned_to_name.clone();
        }
        Ok(existing.clone())
    }

    async fn delete_ticket(&self, id: &str) -> Result<()> {
        let mut backend = self.enter("delete_ticket")?;
        let before = backend.tickets.len();
        backend.tickets.retain(|t| t.id != id);
        if backend.tickets.len() == before {
            return Err(not_found("Ticket"));
        }
        Ok(())
    }

    async fn create_tickets_from_text(&self, text: &str, project_id: &str) -> Result<Vec<Ticket>> {
        let mut backend = self.enter("create_tickets_from_text")?;
        let mut created = Vec::new();
        for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
            let id = backend.next_id("t");
            created.push(ticket(&id, project_id, line));
        }
        backend.tickets.extend(created.iter().cloned());
        Ok(created)
    }

    async fn export_tickets(&self) -> Result<String> {
        Ok(self.enter("export_tickets")?.csv.clone())
    }

    async fn get_users(&self) -> Result<Vec<User>> {
        Ok(self.enter("get_users")?.users.clone())
    }
}
