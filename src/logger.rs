//! Debug logging support for LangTrans
//!
//! When debug logging is enabled (config `logging.debug` or `--verbose`),
//! engine events are written to ~/.langtrans/langtrans.log.

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, prelude::*, registry};

const LOG_FILE_NAME: &str = "langtrans.log";

/// Initialize the debug logging system
///
/// Returns the path to the log file, or None if logging is not enabled.
/// `verbose` raises the default level from info to debug; `RUST_LOG`
/// overrides both.
pub fn init_debug_logging(debug_enabled: bool, verbose: bool) -> Result<Option<PathBuf>> {
    if !debug_enabled && !verbose {
        return Ok(None);
    }

    let log_dir = get_log_dir()?;
    fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(LOG_FILE_NAME)
        .build(&log_dir);

    // If we can't open the log file, gracefully fall back to no logging
    match appender {
        Ok(appender) => {
            let default_level = if verbose { "langtrans=debug" } else { "langtrans=info" };
            let filter = EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_level));

            let subscriber = registry()
                .with(
                    fmt::layer()
                        .with_writer(appender)
                        .with_ansi(false)
                        .with_target(false)
                        .with_thread_ids(false)
                        .with_file(false)
                        .with_line_number(false),
                )
                .with(filter);

            tracing::subscriber::set_global_default(subscriber)
                .map_err(|e| anyhow::anyhow!("Failed to set tracing subscriber: {}", e))?;

            Ok(Some(log_dir.join(LOG_FILE_NAME)))
        }
        Err(e) => {
            eprintln!("Warning: Could not create log file: {}", e);
            Ok(None)
        }
    }
}

fn get_log_dir() -> Result<PathBuf> {
    let home_dir = dirs::home_dir()
        .ok_or_else(|| anyhow::anyhow!("Cannot determine home directory"))?;
    Ok(home_dir.join(".langtrans"))
}

/// Get the log file path without initializing logging
pub fn get_current_log_path() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".langtrans").join(LOG_FILE_NAME))
        .unwrap_or_else(|| PathBuf::from("~/.langtrans/langtrans.log"))
}
