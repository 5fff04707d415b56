//! BradBoard - track projects and tickets from the terminal.

use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, warn};

use bradboard::cli::{Cli, Command};
use bradboard::config::Config;
use bradboard::{commands, logging, App, AppError};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    if let Err(e) = logging::init() {
        eprintln!("Warning: logging disabled: {}", e);
    }

    let result = run(cli).await;
    logging::shutdown();

    match result {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            if e.is_recoverable() {
                warn!("Command failed, retry may succeed: {}", e);
            } else {
                error!("Command failed: {}", e);
            }
            eprintln!("Error: {}", e.user_message());
            if let Some(action) = e.suggested_action() {
                eprintln!("{}", action);
            }
            if e.is_critical() {
                Ok(ExitCode::from(2))
            } else {
                Ok(ExitCode::FAILURE)
            }
        }
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let mut stdout = std::io::stdout().lock();

    let command = match cli.command {
        Command::Config { command } => {
            return commands::run_config(command, &Config::config_path()?, &mut stdout);
        }
        command => command,
    };

    let mut config = Config::load()?;
    if let Some(url) = cli.api_url {
        config.settings.api_base_url = url;
        config.settings.validate()?;
    }
    info!(api = %config.settings.api_base_url, "Configuration loaded");

    let app = App::from_config(&config)?;
    app.initialize().await;

    let mut stdin = std::io::stdin().lock();
    commands::run(&app, command, &mut stdin, &mut stdout).await
}
