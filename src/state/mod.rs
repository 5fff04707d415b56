//! Client-side application state.
//!
//! Two stores own everything the presentation layer renders:
//! - [`AuthStore`] tracks who is logged in
//! - [`DataStore`] holds the project, ticket, and user collections
//!
//! Both publish snapshots through a `tokio::sync::watch` channel, so a view
//! can re-render whenever a store changes without polling.

pub mod auth;
pub mod data;

pub use auth::{AuthState, AuthStore};
pub use data::{DataState, DataStore};

use crate::api::ApiError;

/// The message to show for a failed operation.
fn failure_message(error: &ApiError, fallback: &str) -> String {
    let message = error.to_string();
    if message.trim().is_empty() {
        fallback.to_string()
    } else {
        message
    }
}
