//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::api::{Priority, Status};
use crate::config::CredentialBackend;
use crate::view::SortField;

#[derive(Debug, Parser)]
#[command(name = "bradboard")]
#[command(about = "Track BradBoard projects and tickets from the terminal", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Override the API base URL for this invocation
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in and remember the session
    Login {
        #[arg(long)]
        email: String,

        /// Read from stdin when omitted
        #[arg(long)]
        password: Option<String>,
    },

    /// Create an account and log into it
    Register {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        /// Read from stdin when omitted
        #[arg(long)]
        password: Option<String>,
    },

    /// End the session and forget stored credentials
    Logout,

    /// Show the logged-in user
    Whoami,

    /// Renew the access token without logging in again
    Refresh,

    /// Manage projects
    Projects {
        #[command(subcommand)]
        command: ProjectCommand,
    },

    /// Manage tickets
    Tickets {
        #[command(subcommand)]
        command: TicketCommand,
    },

    /// Create tickets from free text, one per item the server finds
    SmartAdd {
        /// Project the tickets belong to
        #[arg(long, value_name = "PROJECT_ID")]
        project: String,

        /// Read the text from a file instead of stdin
        #[arg(long, value_name = "PATH")]
        file: Option<PathBuf>,
    },

    /// Download all tickets as CSV
    Export {
        /// Directory to write into (defaults to the current directory)
        #[arg(long, value_name = "DIR")]
        dir: Option<PathBuf>,

        /// Open the file once written
        #[arg(long)]
        open: bool,
    },

    /// Inspect or change the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the configuration file path and its settings
    Show,

    /// Change settings and write the file
    Set {
        #[arg(long, value_name = "URL")]
        base_url: Option<String>,

        /// file or keyring
        #[arg(long)]
        credential_backend: Option<CredentialBackend>,

        /// Whether the server offers the user listing
        #[arg(long)]
        users_endpoint: Option<bool>,

        #[arg(long)]
        page_size: Option<u32>,

        /// Per-request timeout in seconds
        #[arg(long, value_name = "SECS")]
        timeout: Option<u64>,
    },
}

#[derive(Debug, Subcommand)]
pub enum ProjectCommand {
    /// List projects
    List,

    /// Create a project
    Create {
        #[arg(long)]
        title: String,

        #[arg(long, default_value = "")]
        description: String,
    },

    /// Change a project's title or description
    Update {
        #[arg(value_name = "PROJECT_ID")]
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        description: Option<String>,
    },

    /// Delete a project and its tickets
    Delete {
        #[arg(value_name = "PROJECT_ID")]
        id: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum TicketCommand {
    /// List tickets
    List(TicketListArgs),

    /// Create a ticket
    Create {
        #[arg(long, value_name = "PROJECT_ID")]
        project: String,

        #[arg(long)]
        title: String,

        #[arg(long, default_value = "")]
        description: String,

        /// open, in-progress or done
        #[arg(long, default_value = "open")]
        status: Status,

        /// low, medium or high
        #[arg(long, default_value = "medium")]
        priority: Priority,

        #[arg(long, value_name = "USER_ID")]
        assignee: Option<String>,

        /// Display name for the assignee when the user list is unavailable
        #[arg(long, value_name = "NAME", requires = "assignee")]
        assignee_name: Option<String>,
    },

    /// Change fields of a ticket
    Update {
        #[arg(value_name = "TICKET_ID")]
        id: String,

        /// Move the ticket to another project
        #[arg(long, value_name = "PROJECT_ID")]
        project: Option<String>,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        status: Option<Status>,

        #[arg(long)]
        priority: Option<Priority>,

        #[arg(long, value_name = "USER_ID")]
        assignee: Option<String>,

        /// Display name for the assignee when the user list is unavailable
        #[arg(long, value_name = "NAME", requires = "assignee")]
        assignee_name: Option<String>,
    },

    /// Delete a ticket
    Delete {
        #[arg(value_name = "TICKET_ID")]
        id: String,
    },
}

#[derive(Debug, Args, Default)]
pub struct TicketListArgs {
    #[arg(long, value_name = "PROJECT_ID")]
    pub project: Option<String>,

    #[arg(long, value_name = "USER_ID")]
    pub assignee: Option<String>,

    #[arg(long)]
    pub status: Option<Status>,

    /// Match text in the title or description
    #[arg(long)]
    pub search: Option<String>,

    /// title, project, assignee, status, priority or created
    #[arg(long, default_value = "priority")]
    pub sort: SortField,

    /// Sort descending
    #[arg(long)]
    pub desc: bool,
}
