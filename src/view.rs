//! Ticket table helpers: filtering, searching, sorting, and label lookup.
//!
//! Pure functions over store snapshots. Nothing here talks to the server.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset};

use crate::api::{Project, Status, Ticket};

/// Label shown when a ticket points at a project we do not know about.
pub const UNKNOWN_PROJECT: &str = "Unknown";

/// Resolve a project's title for display.
pub fn project_label<'a>(projects: &'a [Project], project_id: &str) -> &'a str {
    projects
        .iter()
        .find(|p| p.id == project_id)
        .map(|p| p.title.as_str())
        .unwrap_or(UNKNOWN_PROJECT)
}

/// Criteria for narrowing the ticket table. Unset criteria match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketFilter {
    pub project_id: Option<String>,
    pub assignee_id: Option<String>,
    pub status: Option<Status>,
    /// Case-insensitive substring of title or description.
    pub search: Option<String>,
}

impl TicketFilter {
    pub fn matches(&self, ticket: &Ticket) -> bool {
        let matches_project = self
            .project_id
            .as_deref()
            .map_or(true, |id| ticket.project_id == id);
        let matches_assignee = self
            .assignee_id
            .as_deref()
            .map_or(true, |id| ticket.assigned_to_id.as_deref() == Some(id));
        let matches_status = self.status.map_or(true, |s| ticket.status == s);
        let matches_search = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map_or(true, |q| {
                let q = q.to_lowercase();
                ticket.title.to_lowercase().contains(&q)
                    || ticket.description.to_lowercase().contains(&q)
            });

        matches_project && matches_assignee && matches_status && matches_search
    }

    /// The tickets that match, in their original order.
    pub fn apply<'a>(&self, tickets: &'a [Ticket]) -> Vec<&'a Ticket> {
        tickets.iter().filter(|t| self.matches(t)).collect()
    }
}

/// Column the ticket table is sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    Title,
    Project,
    AssignedTo,
    Status,
    #[default]
    Priority,
    CreatedAt,
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "title" => Ok(SortField::Title),
            "project" => Ok(SortField::Project),
            "assigned_to" | "assignee" => Ok(SortField::AssignedTo),
            "status" => Ok(SortField::Status),
            "priority" => Ok(SortField::Priority),
            "created_at" | "created" => Ok(SortField::CreatedAt),
            other => Err(format!(
                "unknown sort field '{}' (expected title, project, assignee, status, priority or created)",
                other
            )),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SortField::Title => "title",
            SortField::Project => "project",
            SortField::AssignedTo => "assignee",
            SortField::Status => "status",
            SortField::Priority => "priority",
            SortField::CreatedAt => "created",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// Sort order for the ticket table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TicketSort {
    pub field: SortField,
    pub direction: SortDirection,
}

impl TicketSort {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Sort in place. Ties keep their existing order.
    pub fn sort(&self, tickets: &mut [&Ticket], projects: &[Project]) {
        tickets.sort_by(|a, b| {
            let ordering = self.compare(a, b, projects);
            match self.direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });
    }

    fn compare(&self, a: &Ticket, b: &Ticket, projects: &[Project]) -> Ordering {
        match self.field {
            SortField::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
            SortField::Project => sortable_project(projects, &a.project_id)
                .cmp(&sortable_project(projects, &b.project_id)),
            SortField::AssignedTo => sortable_assignee(a).cmp(&sortable_assignee(b)),
            SortField::Status => a.status.cmp(&b.status),
            SortField::Priority => a.priority.cmp(&b.priority),
            SortField::CreatedAt => compare_timestamps(&a.created_at, &b.created_at),
        }
    }
}

fn sortable_project(projects: &[Project], project_id: &str) -> String {
    projects
        .iter()
        .find(|p| p.id == project_id)
        .map(|p| p.title.to_lowercase())
        .unwrap_or_default()
}

fn sortable_assignee(ticket: &Ticket) -> String {
    ticket
        .assigned_to_name
        .as_deref()
        .unwrap_or_default()
        .to_lowercase()
}

fn compare_timestamps(a: &str, b: &str) -> Ordering {
    match (parse_timestamp(a), parse_timestamp(b)) {
        (Some(a), Some(b)) => a.cmp(&b),
        _ => a.cmp(b),
    }
}

fn parse_timestamp(value: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(value).ok()
}

/// Filter then sort, the way the ticket table renders.
pub fn visible_tickets<'a>(
    tickets: &'a [Ticket],
    projects: &[Project],
    filter: &TicketFilter,
    sort: TicketSort,
) -> Vec<&'a Ticket> {
    let mut visible = filter.apply(tickets);
    sort.sort(&mut visible, projects);
    visible
}
