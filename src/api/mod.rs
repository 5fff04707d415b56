//! BradBoard API client and types.
//!
//! This module provides the interface for communicating with the BradBoard
//! REST API: a low-level [`HttpClient`] and the [`BradBoardClient`] facade
//! implementing [`TrackerApi`].

pub mod auth;
pub mod client;
pub mod error;
pub mod http;
pub mod types;

pub use auth::Auth;
pub use client::{BradBoardClient, ClientOptions, TrackerApi};
pub use error::{ApiError, Result};
pub use http::{HttpClient, DEFAULT_BASE_URL};
pub use types::{
    Priority, Project, ProjectDraft, ProjectUpdate, Status, Ticket, TicketDraft, TicketUpdate,
    TicketWithProject, User,
};
