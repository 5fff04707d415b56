//! Command handlers for the terminal front end.
//!
//! Each handler drives the [`App`] and prints a plain-text result. Input and
//! output are passed in so handlers can run against in-memory buffers.

use std::io::{Read, Write};
use std::path::Path;

use tracing::warn;

use crate::api::{
    Project, ProjectDraft, ProjectUpdate, Ticket, TicketDraft, TicketUpdate, TrackerApi, User,
};
use crate::app::App;
use crate::cli::{Command, ConfigCommand, ProjectCommand, TicketCommand, TicketListArgs};
use crate::config::{Config, ConfigError};
use crate::error::{AppError, Result};
use crate::view::{self, SortDirection, TicketFilter, TicketSort};

/// Run one command to completion.
pub async fn run<A, R, W>(app: &App<A>, command: Command, input: &mut R, out: &mut W) -> Result<()>
where
    A: TrackerApi,
    R: Read,
    W: Write,
{
    match command {
        Command::Login { email, password } => {
            let password = password_or_input(password, input)?;
            let user = app.login(&email, &password).await?;
            writeln!(out, "Logged in as {}", describe_user(&user))?;
        }
        Command::Register {
            name,
            email,
            password,
        } => {
            let password = password_or_input(password, input)?;
            let user = app.register(&name, &email, &password).await?;
            writeln!(out, "Registered and logged in as {}", describe_user(&user))?;
        }
        Command::Logout => {
            app.logout().await;
            writeln!(out, "Logged out")?;
        }
        Command::Whoami => {
            let user = app.require_user()?;
            writeln!(out, "{}", describe_user(&user))?;
        }
        Command::Refresh => {
            app.require_user()?;
            app.refresh_session().await?;
            writeln!(out, "Session renewed")?;
        }
        Command::Projects { command } => {
            app.require_user()?;
            run_project_command(app, command, out).await?;
        }
        Command::Tickets { command } => {
            app.require_user()?;
            run_ticket_command(app, command, out).await?;
        }
        Command::SmartAdd { project, file } => {
            app.require_user()?;
            let text = match file {
                Some(path) => tokio::fs::read_to_string(&path).await?,
                None => read_all(input)?,
            };
            if text.trim().is_empty() {
                return Err(AppError::other("No text to create tickets from"));
            }

            let created = app.create_tickets_from_text(&text, &project).await?;
            writeln!(out, "Created {} ticket(s)", created.len())?;
            for ticket in &created {
                writeln!(out, "  {}  {}", ticket.id, ticket.title)?;
            }
        }
        Command::Export { dir, open } => {
            app.require_user()?;
            let dir = match dir {
                Some(dir) => dir,
                None => std::env::current_dir()?,
            };
            let path = app.export_tickets(&dir).await?;
            writeln!(out, "Exported tickets to {}", path.display())?;
            if open {
                open_file(&path);
            }
        }
        Command::Config { .. } => {
            return Err(AppError::other("Configuration commands do not need a session"));
        }
    }
    Ok(())
}

/// Show or change the configuration file at `path`.
pub fn run_config<W: Write>(command: ConfigCommand, path: &Path, out: &mut W) -> Result<()> {
    match command {
        ConfigCommand::Show => {
            let config = Config::read_from(path)?;
            let contents = toml::to_string_pretty(&config.settings).map_err(ConfigError::from)?;
            writeln!(out, "# {}", path.display())?;
            write!(out, "{}", contents)?;
        }
        ConfigCommand::Set {
            base_url,
            credential_backend,
            users_endpoint,
            page_size,
            timeout,
        } => {
            let mut config = Config::read_from(path)?;
            let before = config.clone();
            let settings = &mut config.settings;
            if let Some(url) = base_url {
                settings.api_base_url = url;
            }
            if let Some(backend) = credential_backend {
                settings.credential_backend = backend;
            }
            if let Some(enabled) = users_endpoint {
                settings.users_endpoint = enabled;
            }
            if let Some(size) = page_size {
                settings.page_size = size;
            }
            if let Some(secs) = timeout {
                settings.request_timeout_secs = Some(secs);
            }
            if config == before {
                return Err(AppError::other("Nothing to update"));
            }
            config.save_to(path)?;
            writeln!(out, "Saved {}", path.display())?;
        }
    }
    Ok(())
}

async fn run_project_command<A: TrackerApi, W: Write>(
    app: &App<A>,
    command: ProjectCommand,
    out: &mut W,
) -> Result<()> {
    match command {
        ProjectCommand::List => {
            let state = app.data_state();
            loaded(&state.error)?;
            write_projects(out, &state.projects, &state.tickets)?;
        }
        ProjectCommand::Create { title, description } => {
            let project = app
                .create_project(&ProjectDraft::new(title, description))
                .await?;
            writeln!(out, "Created project {}  {}", project.id, project.title)?;
        }
        ProjectCommand::Update {
            id,
            title,
            description,
        } => {
            if title.is_none() && description.is_none() {
                return Err(AppError::other("Nothing to update"));
            }
            let state = app.data_state();
            loaded(&state.error)?;
            let current = state
                .project(&id)
                .ok_or_else(|| AppError::other(format!("Unknown project '{}'", id)))?;

            // Edits resend every field, starting from the record as loaded.
            let mut draft = ProjectDraft::from(current);
            if let Some(title) = title {
                draft.title = title;
            }
            if let Some(description) = description {
                draft.description = description;
            }
            let project = app
                .update_project(&id, &ProjectUpdate::from(draft))
                .await?;
            writeln!(out, "Updated project {}  {}", project.id, project.title)?;
        }
        ProjectCommand::Delete { id } => {
            let dropped = app
                .data_state()
                .tickets
                .iter()
                .filter(|t| t.project_id == id)
                .count();
            app.delete_project(&id).await?;
            writeln!(out, "Deleted project {} and {} ticket(s)", id, dropped)?;
        }
    }
    Ok(())
}

async fn run_ticket_command<A: TrackerApi, W: Write>(
    app: &App<A>,
    command: TicketCommand,
    out: &mut W,
) -> Result<()> {
    match command {
        TicketCommand::List(args) => {
            let state = app.data_state();
            loaded(&state.error)?;
            let (filter, sort) = list_options(args);
            let visible = view::visible_tickets(&state.tickets, &state.projects, &filter, sort);
            write_tickets(out, &visible, &state.projects)?;
        }
        TicketCommand::Create {
            project,
            title,
            description,
            status,
            priority,
            assignee,
            assignee_name,
        } => {
            let assigned_to_name = match assignee.as_deref() {
                Some(id) => Some(resolve_assignee(&app.data_state().users, id, assignee_name)?),
                None => None,
            };
            let draft = TicketDraft {
                project_id: project,
                title,
                description,
                status,
                priority,
                assigned_to_id: assignee,
                assigned_to_name,
            };
            let ticket = app.create_ticket(&draft).await?;
            writeln!(out, "Created ticket {}  {}", ticket.id, ticket.title)?;
        }
        TicketCommand::Update {
            id,
            project,
            title,
            description,
            status,
            priority,
            assignee,
            assignee_name,
        } => {
            let nothing_given = project.is_none()
                && title.is_none()
                && description.is_none()
                && status.is_none()
                && priority.is_none()
                && assignee.is_none();
            if nothing_given {
                return Err(AppError::other("Nothing to update"));
            }
            let state = app.data_state();
            loaded(&state.error)?;
            let current = state
                .ticket(&id)
                .ok_or_else(|| AppError::other(format!("Unknown ticket '{}'", id)))?;

            // Edits resend every field, starting from the record as loaded.
            let mut draft = TicketDraft::from(current);
            if let Some(project) = project {
                draft.project_id = project;
            }
            if let Some(title) = title {
                draft.title = title;
            }
            if let Some(description) = description {
                draft.description = description;
            }
            if let Some(status) = status {
                draft.status = status;
            }
            if let Some(priority) = priority {
                draft.priority = priority;
            }
            if let Some(user_id) = assignee {
                draft.assigned_to_name =
                    Some(resolve_assignee(&state.users, &user_id, assignee_name)?);
                draft.assigned_to_id = Some(user_id);
            }
            let ticket = app.update_ticket(&id, &TicketUpdate::from(draft)).await?;
            writeln!(out, "Updated ticket {}  {}", ticket.id, ticket.title)?;
        }
        TicketCommand::Delete { id } => {
            app.delete_ticket(&id).await?;
            writeln!(out, "Deleted ticket {}", id)?;
        }
    }
    Ok(())
}

fn list_options(args: TicketListArgs) -> (TicketFilter, TicketSort) {
    let filter = TicketFilter {
        project_id: args.project,
        assignee_id: args.assignee,
        status: args.status,
        search: args.search,
    };
    let direction = if args.desc {
        SortDirection::Descending
    } else {
        SortDirection::Ascending
    };
    (filter, TicketSort::new(args.sort, direction))
}

/// A failed load leaves the collections stale; refuse to print them.
fn loaded(error: &Option<String>) -> Result<()> {
    match error {
        Some(message) => Err(AppError::other(message.clone())),
        None => Ok(()),
    }
}

/// The display name stored next to an assignee id.
fn resolve_assignee(users: &[User], id: &str, explicit: Option<String>) -> Result<String> {
    if let Some(name) = explicit {
        return Ok(name);
    }
    users
        .iter()
        .find(|u| u.id == id)
        .map(|u| u.name.clone())
        .ok_or_else(|| {
            AppError::other(format!(
                "Unknown user '{}'. Pass --assignee-name, or set users_endpoint = true \
                 to load the user list.",
                id
            ))
        })
}

fn describe_user(user: &User) -> String {
    format!("{} <{}>", user.name, user.email)
}

fn password_or_input<R: Read>(password: Option<String>, input: &mut R) -> Result<String> {
    let password = match password {
        Some(password) => password,
        None => read_all(input)?.lines().next().unwrap_or_default().to_string(),
    };
    if password.is_empty() {
        return Err(AppError::other("A password is required"));
    }
    Ok(password)
}

fn read_all<R: Read>(input: &mut R) -> Result<String> {
    let mut text = String::new();
    input.read_to_string(&mut text)?;
    Ok(text)
}

fn open_file(path: &Path) {
    if let Err(e) = open::that(path) {
        warn!("Failed to open {}: {}", path.display(), e);
    }
}

fn write_projects<W: Write>(out: &mut W, projects: &[Project], tickets: &[Ticket]) -> Result<()> {
    if projects.is_empty() {
        writeln!(out, "No projects")?;
        return Ok(());
    }

    let rows: Vec<Vec<String>> = projects
        .iter()
        .map(|p| {
            let count = tickets.iter().filter(|t| t.project_id == p.id).count();
            vec![
                p.id.clone(),
                p.title.clone(),
                count.to_string(),
                p.created_by_name.clone(),
                date_part(&p.created_at).to_string(),
            ]
        })
        .collect();

    write_table(out, &["ID", "TITLE", "TICKETS", "OWNER", "CREATED"], &rows)
}

fn write_tickets<W: Write>(out: &mut W, tickets: &[&Ticket], projects: &[Project]) -> Result<()> {
    if tickets.is_empty() {
        writeln!(out, "No tickets")?;
        return Ok(());
    }

    let rows: Vec<Vec<String>> = tickets
        .iter()
        .map(|t| {
            vec![
                t.id.clone(),
                t.title.clone(),
                view::project_label(projects, &t.project_id).to_string(),
                t.assignee_name().to_string(),
                t.status.label().to_string(),
                t.priority.label().to_string(),
                date_part(&t.created_at).to_string(),
            ]
        })
        .collect();

    write_table(
        out,
        &["ID", "TITLE", "PROJECT", "ASSIGNEE", "STATUS", "PRIORITY", "CREATED"],
        &rows,
    )
}

fn write_table<W: Write>(out: &mut W, headers: &[&str], rows: &[Vec<String>]) -> Result<()> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let header: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    write_row(out, &header, &widths)?;
    for row in rows {
        write_row(out, row, &widths)?;
    }
    Ok(())
}

fn write_row<W: Write>(out: &mut W, cells: &[String], widths: &[usize]) -> Result<()> {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = width))
        .collect::<Vec<_>>()
        .join("  ");
    writeln!(out, "{}", line.trim_end())?;
    Ok(())
}

fn date_part(timestamp: &str) -> &str {
    timestamp.split('T').next().unwrap_or(timestamp)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::api::{Priority, Status};
    use crate::storage::MemoryStore;
    use crate::testing::{project, ticket, user, FakeApi};
    use crate::view::SortField;

    async fn logged_in_app() -> (App<FakeApi>, Arc<FakeApi>) {
        let mut urgent = ticket("t2", "p1", "Broken login");
        urgent.priority = Priority::High;
        urgent.status = Status::InProgress;

        let api = Arc::new(
            FakeApi::new()
                .with_user(user("u1", "Brad"))
                .with_users(vec![user("u1", "Brad"), user("u2", "Dana")])
                .with_projects(vec![project("p1", "Site Revamp")])
                .with_tickets(vec![ticket("t1", "p1", "Fix header"), urgent])
                .with_csv("id,title\nt1,Fix header\n"),
        );
        let app = App::new(api.clone(), Arc::new(MemoryStore::new()));
        app.login("brad@example.com", "secret").await.unwrap();
        (app, api)
    }

    async fn run_to_string(app: &App<FakeApi>, command: Command, input: &str) -> Result<String> {
        let mut out = Vec::new();
        run(app, command, &mut input.as_bytes(), &mut out).await?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[tokio::test]
    async fn test_login_reads_password_from_input() {
        let api = Arc::new(FakeApi::new().with_user(user("u1", "Brad")));
        let app = App::new(api, Arc::new(MemoryStore::new()));

        let output = run_to_string(
            &app,
            Command::Login {
                email: "brad@example.com".into(),
                password: None,
            },
            "secret\n",
        )
        .await
        .unwrap();

        assert_eq!(output, "Logged in as Brad <brad@example.com>\n");
    }

    #[tokio::test]
    async fn test_login_without_password_fails() {
        let app = App::new(Arc::new(FakeApi::new()), Arc::new(MemoryStore::new()));
        let command = Command::Login {
            email: "brad@example.com".into(),
            password: None,
        };
        assert!(run_to_string(&app, command, "").await.is_err());
    }

    #[tokio::test]
    async fn test_data_commands_require_login() {
        let app = App::new(Arc::new(FakeApi::new()), Arc::new(MemoryStore::new()));
        let command = Command::Projects {
            command: ProjectCommand::List,
        };

        let err = run_to_string(&app, command, "").await.unwrap_err();
        assert!(err.suggested_action().unwrap().contains("bradboard login"));
    }

    #[tokio::test]
    async fn test_ticket_list_sorted_by_priority_descending() {
        let (app, _) = logged_in_app().await;
        let args = TicketListArgs {
            sort: SortField::Priority,
            desc: true,
            ..TicketListArgs::default()
        };
        let output = run_to_string(
            &app,
            Command::Tickets {
                command: TicketCommand::List(args),
            },
            "",
        )
        .await
        .unwrap();

        let lines: Vec<&str> = output.lines().collect();
        assert!(lines[0].starts_with("ID"));
        assert!(lines[1].starts_with("t2"));
        assert!(lines[1].contains("In Progress"));
        assert!(lines[2].contains("Unassigned"));
    }

    #[tokio::test]
    async fn test_ticket_list_with_no_matches() {
        let (app, _) = logged_in_app().await;
        let args = TicketListArgs {
            search: Some("nothing like this".into()),
            ..TicketListArgs::default()
        };
        let output = run_to_string(
            &app,
            Command::Tickets {
                command: TicketCommand::List(args),
            },
            "",
        )
        .await
        .unwrap();
        assert_eq!(output, "No tickets\n");
    }

    #[tokio::test]
    async fn test_project_list_counts_tickets() {
        let (app, _) = logged_in_app().await;
        let output = run_to_string(
            &app,
            Command::Projects {
                command: ProjectCommand::List,
            },
            "",
        )
        .await
        .unwrap();

        let row = output.lines().nth(1).unwrap();
        assert!(row.contains("Site Revamp"));
        assert!(row.contains("  2  "));
    }

    #[tokio::test]
    async fn test_ticket_create_resolves_assignee_name() {
        let (app, _) = logged_in_app().await;
        let command = Command::Tickets {
            command: TicketCommand::Create {
                project: "p1".into(),
                title: "Add footer".into(),
                description: String::new(),
                status: Status::Open,
                priority: Priority::Low,
                assignee: Some("u2".into()),
                assignee_name: None,
            },
        };

        run_to_string(&app, command, "").await.unwrap();

        let state = app.data_state();
        let created = state.tickets.iter().find(|t| t.title == "Add footer").unwrap();
        assert_eq!(created.assigned_to_name.as_deref(), Some("Dana"));
    }

    #[tokio::test]
    async fn test_ticket_create_with_unknown_assignee_fails() {
        let (app, api) = logged_in_app().await;
        let command = Command::Tickets {
            command: TicketCommand::Create {
                project: "p1".into(),
                title: "Add footer".into(),
                description: String::new(),
                status: Status::Open,
                priority: Priority::Low,
                assignee: Some("u9".into()),
                assignee_name: None,
            },
        };

        let err = run_to_string(&app, command, "").await.unwrap_err();

        assert!(err.user_message().contains("Unknown user 'u9'"));
        assert!(!api.calls().contains(&"create_ticket"));
    }

    #[tokio::test]
    async fn test_ticket_update_uses_explicit_assignee_name() {
        let api = Arc::new(
            FakeApi::new()
                .with_user(user("u1", "Brad"))
                .with_projects(vec![project("p1", "Site Revamp")])
                .with_tickets(vec![ticket("t1", "p1", "Fix header")]),
        );
        let app = App::new(api.clone(), Arc::new(MemoryStore::new()));
        app.login("brad@example.com", "secret").await.unwrap();

        let command = Command::Tickets {
            command: TicketCommand::Update {
                id: "t1".into(),
                project: None,
                title: None,
                description: None,
                status: None,
                priority: None,
                assignee: Some("u7".into()),
                assignee_name: Some("Kim".into()),
            },
        };
        run_to_string(&app, command, "").await.unwrap();

        let sent = api.sent_updates();
        assert_eq!(sent[0]["assigned_to_id"], "u7");
        assert_eq!(sent[0]["assigned_to_name"], "Kim");
        let state = app.data_state();
        assert_eq!(state.ticket("t1").unwrap().assigned_to_name.as_deref(), Some("Kim"));
    }

    #[tokio::test]
    async fn test_ticket_update_sends_whole_record() {
        let (app, api) = logged_in_app().await;
        let command = Command::Tickets {
            command: TicketCommand::Update {
                id: "t2".into(),
                project: None,
                title: Some("Broken login page".into()),
                description: None,
                status: None,
                priority: None,
                assignee: None,
                assignee_name: None,
            },
        };

        run_to_string(&app, command, "").await.unwrap();

        let sent = api.sent_updates();
        assert_eq!(sent.len(), 1);
        let body = &sent[0];
        assert_eq!(body["title"], "Broken login page");
        assert_eq!(body["project_id"], "p1");
        assert_eq!(body["status"], "in progress");
        assert_eq!(body["priority"], 3);
        assert!(body.get("description").is_some());
    }

    #[tokio::test]
    async fn test_project_update_sends_whole_record() {
        let (app, api) = logged_in_app().await;
        let command = Command::Projects {
            command: ProjectCommand::Update {
                id: "p1".into(),
                title: None,
                description: Some("Refresh the marketing site".into()),
            },
        };

        run_to_string(&app, command, "").await.unwrap();

        let sent = api.sent_updates();
        assert_eq!(sent[0]["title"], "Site Revamp");
        assert_eq!(sent[0]["description"], "Refresh the marketing site");
    }

    #[tokio::test]
    async fn test_update_of_unknown_ticket_is_rejected() {
        let (app, api) = logged_in_app().await;
        let command = Command::Tickets {
            command: TicketCommand::Update {
                id: "t404".into(),
                project: None,
                title: Some("Anything".into()),
                description: None,
                status: None,
                priority: None,
                assignee: None,
                assignee_name: None,
            },
        };

        let err = run_to_string(&app, command, "").await.unwrap_err();
        assert_eq!(err.user_message(), "Unknown ticket 't404'");
        assert!(!api.calls().contains(&"update_ticket"));
    }

    #[tokio::test]
    async fn test_refresh_command() {
        let (app, api) = logged_in_app().await;
        let output = run_to_string(&app, Command::Refresh, "").await.unwrap();

        assert_eq!(output, "Session renewed\n");
        assert!(api.calls().contains(&"refresh_session"));
    }

    #[test]
    fn test_config_set_then_show() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let mut out = Vec::new();
        run_config(
            ConfigCommand::Set {
                base_url: None,
                credential_backend: Some(crate::config::CredentialBackend::Keyring),
                users_endpoint: Some(true),
                page_size: None,
                timeout: None,
            },
            &path,
            &mut out,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(
            config.settings.credential_backend,
            crate::config::CredentialBackend::Keyring
        );
        assert!(config.settings.users_endpoint);

        let mut out = Vec::new();
        run_config(ConfigCommand::Show, &path, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("credential_backend = \"keyring\""));
        assert!(text.contains("users_endpoint = true"));
    }

    #[test]
    fn test_config_set_rejects_bad_value() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let command = ConfigCommand::Set {
            base_url: None,
            credential_backend: None,
            users_endpoint: None,
            page_size: Some(0),
            timeout: None,
        };
        assert!(run_config(command, &path, &mut Vec::new()).is_err());
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_empty_update_is_rejected() {
        let (app, api) = logged_in_app().await;
        let command = Command::Projects {
            command: ProjectCommand::Update {
                id: "p1".into(),
                title: None,
                description: None,
            },
        };

        assert!(run_to_string(&app, command, "").await.is_err());
        assert!(!api.calls().contains(&"update_project"));
    }

    #[tokio::test]
    async fn test_project_delete_reports_dropped_tickets() {
        let (app, _) = logged_in_app().await;
        let output = run_to_string(
            &app,
            Command::Projects {
                command: ProjectCommand::Delete { id: "p1".into() },
            },
            "",
        )
        .await
        .unwrap();

        assert_eq!(output, "Deleted project p1 and 2 ticket(s)\n");
        assert!(app.data_state().tickets.is_empty());
    }

    #[tokio::test]
    async fn test_smart_add_from_input() {
        let (app, _) = logged_in_app().await;
        let output = run_to_string(
            &app,
            Command::SmartAdd {
                project: "p1".into(),
                file: None,
            },
            "Write docs\nShip release\n",
        )
        .await
        .unwrap();

        assert!(output.starts_with("Created 2 ticket(s)"));
        assert_eq!(app.data_state().tickets.len(), 4);
    }

    #[tokio::test]
    async fn test_smart_add_rejects_blank_text() {
        let (app, api) = logged_in_app().await;
        let command = Command::SmartAdd {
            project: "p1".into(),
            file: None,
        };

        assert!(run_to_string(&app, command, "  \n").await.is_err());
        assert!(!api.calls().contains(&"create_tickets_from_text"));
    }

    #[tokio::test]
    async fn test_export_writes_file() {
        let (app, _) = logged_in_app().await;
        let dir = tempfile::TempDir::new().unwrap();

        let output = run_to_string(
            &app,
            Command::Export {
                dir: Some(dir.path().to_path_buf()),
                open: false,
            },
            "",
        )
        .await
        .unwrap();

        let path = dir.path().join(crate::state::data::export_file_name());
        assert!(output.contains(&path.display().to_string()));
        assert_eq!(std::fs::read_to_string(path).unwrap(), "id,title\nt1,Fix header\n");
    }

    #[test]
    fn test_write_table_aligns_columns() {
        let mut out = Vec::new();
        let rows = vec![
            vec!["t1".to_string(), "Short".to_string()],
            vec!["t10".to_string(), "A longer title".to_string()],
        ];
        write_table(&mut out, &["ID", "TITLE"], &rows).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "ID   TITLE\nt1   Short\nt10  A longer title\n");
    }

    #[test]
    fn test_date_part() {
        assert_eq!(date_part("2024-05-01T10:00:00+00:00"), "2024-05-01");
        assert_eq!(date_part("2024-05-01"), "2024-05-01");
    }
}
