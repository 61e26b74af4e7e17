//! Logging setup
//!
//! All diagnostics go through `tracing`. Binaries call [`init_logging`] once;
//! libraries embedding the client install their own subscriber instead.

use crate::config::LoggingConfig;
use crate::utils::error::{ApiError, Result};
use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber
///
/// `RUST_LOG` overrides the configured level. Returns `Ok(false)` when a
/// subscriber was already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<bool> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level)
            .map_err(|e| ApiError::config(format!("Invalid log level '{}': {}", config.level, e)))?,
    };

    let installed = if config.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .try_init()
            .is_ok()
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_thread_ids(false)
            .try_init()
            .is_ok()
    };

    Ok(installed)
}
