use std::io;

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::{config::env::LoggingConfig, infrastructure::directories::ResolvedPaths};

const LOG_FILE_PREFIX: &str = "hike-reviews.log";

static GUARD: OnceCell<WorkerGuard> = OnceCell::new();

/// Installs the global subscriber. Console events go to stderr so that stdout
/// carries only prompts and reports; the file layer rolls daily.
pub fn init_tracing(logging: &LoggingConfig, paths: &ResolvedPaths) -> Result<()> {
    if GUARD.get().is_some() {
        return Ok(());
    }

    let (file_writer, guard) =
        tracing_appender::non_blocking(rolling::daily(&paths.logs_dir, LOG_FILE_PREFIX));

    let console_layer = fmt::layer().with_writer(io::stderr).with_target(true);
    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_target(true)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(level_filter(&logging.level))
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .context("tracing subscriber already installed")?;
    let _ = GUARD.set(guard);

    tracing::debug!(
        target: "app",
        dir = %paths.logs_dir.display(),
        prefix = LOG_FILE_PREFIX,
        "file logging enabled"
    );
    Ok(())
}

/// `RUST_LOG` first, then the configured level, then `info`.
fn level_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}
