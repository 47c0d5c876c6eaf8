//! Console and rolling file logging

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::level_filters::LevelFilter;
use tracing::warn;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{Layer, fmt};

use crate::constants::logging::{FILE_PREFIX, FILE_SUFFIX, LEVEL_ENV};

/// Parse log level from the environment, defaulting to info
fn level_from_env() -> LevelFilter {
    match std::env::var(LEVEL_ENV)
        .unwrap_or_else(|_| "info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "warn" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        _ => LevelFilter::INFO,
    }
}

fn file_appender(log_dir: &Path) -> Result<RollingFileAppender> {
    fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;

    RollingFileAppender::builder()
        .rotation(Rotation::HOURLY)
        .filename_prefix(FILE_PREFIX)
        .filename_suffix(FILE_SUFFIX)
        .build(log_dir)
        .with_context(|| format!("Failed to open log file in {}", log_dir.display()))
}

/// Install the global subscriber
///
/// The returned guard flushes the file writer when dropped and must live
/// until the process exits. Falls back to console-only logging when the
/// log directory is unusable.
pub fn init(verbose: bool, log_dir: &Path) -> Result<Option<WorkerGuard>> {
    let level = if verbose { LevelFilter::DEBUG } else { level_from_env() };

    let console = fmt::layer().compact().with_filter(level);

    let (file_layer, guard, file_error) = match file_appender(log_dir) {
        Ok(appender) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false).with_filter(level);
            (Some(layer), Some(guard), None)
        }
        Err(e) => (None, None, Some(e)),
    };

    tracing_subscriber::registry()
        .with(console)
        .with(file_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    if let Some(e) = file_error {
        warn!(error = %format!("{e:#}"), "File logging disabled");
    }

    Ok(guard)
}
