//! BradBoard API request and response types.
//!
//! These types model the JSON exchanged with the BradBoard REST API.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::ApiError;

/// A BradBoard user.
///
/// Returned by `GET /auth/me` and `GET /users/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// A project grouping tickets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub created_by_id: String,
    pub created_by_name: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Ticket workflow status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum Status {
    #[default]
    #[serde(rename = "open")]
    Open,
    #[serde(rename = "in progress")]
    InProgress,
    #[serde(rename = "done")]
    Done,
}

impl Status {
    /// All statuses in workflow order.
    pub const ALL: [Status; 3] = [Status::Open, Status::InProgress, Status::Done];

    /// The wire value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Open => "open",
            Status::InProgress => "in progress",
            Status::Done => "done",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Status::Open => "Open",
            Status::InProgress => "In Progress",
            Status::Done => "Done",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', '_'], " ").as_str() {
            "open" => Ok(Status::Open),
            "in progress" => Ok(Status::InProgress),
            "done" => Ok(Status::Done),
            other => Err(format!(
                "unknown status '{}' (expected open, in-progress or done)",
                other
            )),
        }
    }
}

/// Ticket priority, sent over the wire as 1, 2 or 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Priority {
    Low = 1,
    #[default]
    Medium = 2,
    High = 3,
}

impl Priority {
    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }
}

impl TryFrom<u8> for Priority {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Priority::Low),
            2 => Ok(Priority::Medium),
            3 => Ok(Priority::High),
            other => Err(format!("invalid priority {}, expected 1, 2 or 3", other)),
        }
    }
}

impl From<Priority> for u8 {
    fn from(priority: Priority) -> Self {
        priority as u8
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1" | "low" => Ok(Priority::Low),
            "2" | "medium" => Ok(Priority::Medium),
            "3" | "high" => Ok(Priority::High),
            other => Err(format!(
                "unknown priority '{}' (expected low, medium or high)",
                other
            )),
        }
    }
}

/// A unit of trackable work belonging to a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: String,
    pub project_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub created_by_id: String,
    pub created_by_name: String,
    pub status: Status,
    pub priority: Priority,
    #[serde(default)]
    pub assigned_to_id: Option<String>,
    #[serde(default)]
    pub assigned_to_name: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Ticket {
    /// The assignee's name, or "Unassigned".
    pub fn assignee_name(&self) -> &str {
        self.assigned_to_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or("Unassigned")
    }
}

/// A ticket as returned by the list endpoint, with its project title attached.
#[derive(Debug, Clone, Deserialize)]
pub struct TicketWithProject {
    #[serde(flatten)]
    pub ticket: Ticket,
    pub project_title: String,
}

impl TicketWithProject {
    /// Drop the denormalized project title.
    pub fn into_ticket(self) -> Ticket {
        self.ticket
    }
}

/// Token pair returned by `POST /auth/login`, `/auth/register` and `/auth/refresh`.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub token_type: String,
}

/// One page of projects from `GET /projects/`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectList {
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub size: u32,
}

/// One page of tickets from `GET /tickets/`.
#[derive(Debug, Clone, Deserialize)]
pub struct TicketList {
    #[serde(default)]
    pub tickets: Vec<TicketWithProject>,
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub size: u32,
}

/// Response of `POST /create`.
#[derive(Debug, Clone, Deserialize)]
pub struct SmartCreateResponse {
    #[serde(default)]
    pub created_tickets: Vec<Ticket>,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct RegisterRequest<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct SmartCreateRequest<'a> {
    pub text: &'a str,
    pub project_id: &'a str,
}

/// The editable fields of a project, as filled in by a form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProjectDraft {
    pub title: String,
    pub description: String,
}

impl ProjectDraft {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }

    /// Reject drafts with a blank title.
    pub fn validate(&self) -> Result<(), ApiError> {
        require_title(&self.title, "Project")
    }
}

/// Fields to change on a project. Unset fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProjectUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ProjectUpdate {
    pub fn validate(&self) -> Result<(), ApiError> {
        match &self.title {
            Some(title) => require_title(title, "Project"),
            None => Ok(()),
        }
    }
}

impl From<&Project> for ProjectDraft {
    /// Prefill an edit form from the current record.
    fn from(project: &Project) -> Self {
        Self::new(project.title.clone(), project.description.clone())
    }
}

impl From<ProjectDraft> for ProjectUpdate {
    fn from(draft: ProjectDraft) -> Self {
        Self {
            title: Some(draft.title),
            description: Some(draft.description),
        }
    }
}

/// The editable fields of a ticket, as filled in by a form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TicketDraft {
    pub project_id: String,
    pub title: String,
    pub description: String,
    pub status: Status,
    pub priority: Priority,
    pub assigned_to_id: Option<String>,
    pub assigned_to_name: Option<String>,
}

impl TicketDraft {
    pub fn new(project_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    /// Reject drafts with a blank title or no project.
    pub fn validate(&self) -> Result<(), ApiError> {
        require_title(&self.title, "Ticket")?;
        if self.project_id.trim().is_empty() {
            return Err(ApiError::Validation("Ticket must belong to a project".into()));
        }
        Ok(())
    }
}

/// Fields to change on a ticket. Unset fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TicketUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to_name: Option<String>,
}

impl TicketUpdate {
    pub fn validate(&self) -> Result<(), ApiError> {
        if let Some(title) = &self.title {
            require_title(title, "Ticket")?;
        }
        if matches!(&self.project_id, Some(id) if id.trim().is_empty()) {
            return Err(ApiError::Validation("Ticket must belong to a project".into()));
        }
        Ok(())
    }
}

impl From<&Ticket> for TicketDraft {
    /// Prefill an edit form from the current record.
    fn from(ticket: &Ticket) -> Self {
        Self {
            project_id: ticket.project_id.clone(),
            title: ticket.title.clone(),
            description: ticket.description.clone(),
            status: ticket.status,
            priority: ticket.priority,
            assigned_to_id: ticket.assigned_to_id.clone(),
            assigned_to_name: ticket.assigned_to_name.clone(),
        }
    }
}

impl From<TicketDraft> for TicketUpdate {
    fn from(draft: TicketDraft) -> Self {
        Self {
            project_id: Some(draft.project_id),
            title: Some(draft.title),
            description: Some(draft.description),
            status: Some(draft.status),
            priority: Some(draft.priority),
            assigned_to_id: draft.assigned_to_id,
            assigned_to_name: draft.assigned_to_name,
        }
    }
}

fn require_title(title: &str, kind: &str) -> Result<(), ApiError> {
    if title.trim().is_empty() {
        Err(ApiError::Validation(format!("{} title cannot be empty", kind)))
    } else {
        Ok(())
    }
}
