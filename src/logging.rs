//! Diagnostic logging.
//!
//! Command output owns stdout, so tracing events go to a file that rolls over
//! daily under `<data_local_dir>/bradboard/logs/`. `RUST_LOG` replaces the
//! default filter.

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

const DEFAULT_FILTER: &str = "bradboard=info,warn";

const FILE_PREFIX: &str = "bradboard.log";

/// Install the global subscriber, writing into the default log directory.
///
/// ```no_run
/// bradboard::logging::init().expect("logging");
/// ```
pub fn init() -> anyhow::Result<()> {
    let dir = log_directory().context("no local data directory for logs")?;
    init_in(&dir)
}

/// Install the global subscriber, writing into `dir`.
pub fn init_in(dir: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("creating log directory {}", dir.display()))?;

    let appender = RollingFileAppender::new(Rotation::DAILY, dir, FILE_PREFIX);
    let file_layer = fmt::layer()
        .with_writer(appender)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(env_filter())
        .try_init()
        .context("a global tracing subscriber is already installed")?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "bradboard started");
    tracing::debug!(dir = %dir.display(), "Writing logs");
    Ok(())
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Where log files are written, if the platform has a data directory.
pub fn log_directory() -> Option<PathBuf> {
    dirs::data_local_dir().map(|base| base.join("bradboard").join("logs"))
}

pub fn shutdown() {
    tracing::info!("bradboard finished");
}
