//! Rolling file logger.
//!
//! Log output goes to daily-rotated files in the application's data
//! directory so it never interleaves with the interactive terminal.

use crate::{AppError, AppResult, config::Config};

use std::{
    fs,
    panic::Location,
    path::Path,
    sync::OnceLock,
};

use error_location::ErrorLocation;
use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{EnvFilter, prelude::*};

/// Log file name prefix; rotated files get a `.YYYY-MM-DD` suffix.
const LOG_FILE_NAME: &str = "take-recorder.log";

/// Rotated log files kept at startup.
const MAX_LOG_FILES: usize = 7;

/// Filter used when `RUST_LOG` is not set.
const DEFAULT_FILTER: &str = "take_recorder=debug,take_recorder_core=debug";

/// Keeps the non-blocking writer alive for the program lifetime.
static APPENDER_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Installs the global subscriber writing to the log directory.
#[track_caller]
pub(crate) fn init_logging() -> AppResult<()> {
    let log_dir = Config::log_directory()?;
    fs::create_dir_all(&log_dir)?;

    if let Err(e) = cleanup_old_logs(&log_dir) {
        eprintln!("Warning: Failed to clean up old logs: {}", e);
    }

    let file_appender = rolling::daily(&log_dir, LOG_FILE_NAME);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    APPENDER_GUARD.set(guard).map_err(|_| AppError::ConfigError {
        reason: "Logging already initialized".to_string(),
        location: ErrorLocation::from(Location::caller()),
    })?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_target(true)
                .with_thread_ids(true)
                .with_ansi(false),
        )
        .init();

    tracing::debug!(log_dir = ?log_dir, "Logging initialized");

    Ok(())
}

/// Removes rotated log files beyond the newest [`MAX_LOG_FILES`].
pub(crate) fn cleanup_old_logs(log_dir: &Path) -> AppResult<usize> {
    let prefix = format!("{}.", LOG_FILE_NAME);

    let mut log_files: Vec<_> = fs::read_dir(log_dir)?
        .filter_map(|entry| {
            let path = entry.ok()?.path();
            let file_name = path.file_name()?.to_string_lossy().to_string();
            if !file_name.starts_with(&prefix) {
                return None;
            }
            let modified = fs::metadata(&path).ok()?.modified().ok()?;
            Some((path, modified))
        })
        .collect();

    // Newest first
    log_files.sort_by(|a, b| b.1.cmp(&a.1));

    let mut removed = 0;
    for (path, _) in log_files.iter().skip(MAX_LOG_FILES) {
        match fs::remove_file(path) {
            Ok(()) => removed += 1,
            Err(e) => tracing::warn!(path = ?path, error = %e, "Failed to delete old log file"),
        }
    }

    Ok(removed)
}
