//! BradBoard - client core for the BradBoard project and ticket tracker.
//!
//! The library holds the REST client, the auth and data stores, and the
//! ticket table helpers. The `bradboard` binary is a thin terminal front end
//! over [`app::App`].

pub mod api;
pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod state;
pub mod storage;
pub mod view;

#[cfg(test)]
mod testing;

pub use app::App;
pub use error::{AppError, Result};
