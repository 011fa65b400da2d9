use std::fs::OpenOptions;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_FILE_ENV: &str = "NAMO_LOG_FILE";

/// Install the global subscriber.
///
/// The terminal belongs to the dashboard, so logs only go to a file, and
/// only when `NAMO_LOG_FILE` is set. `RUST_LOG` picks the level (default
/// `info`).
pub fn init() -> Result<()> {
    let Some(log_path) = std::env::var_os(LOG_FILE_ENV) else {
        return Ok(());
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("failed to open log file {}", log_path.to_string_lossy()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .try_init()
        .context("failed to install tracing subscriber")?;

    tracing::info!("namo v{} starting", env!("CARGO_PKG_VERSION"));
    Ok(())
}
