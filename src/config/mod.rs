//! Configuration management for the client
//!
//! Configuration comes from a YAML file, from `MERCURY_*` environment
//! variables, or from [`ConfigBuilder`]. Every source is validated before use.

pub mod builder;
pub mod models;
pub mod validation;

pub use builder::ConfigBuilder;
pub use models::*;
pub use validation::Validate;

use crate::utils::error::{ApiError, Result};
use std::path::Path;
use tracing::{debug, info};

/// Environment variable names
pub const ENV_BASE_URL: &str = "MERCURY_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "MERCURY_TIMEOUT_SECS";
pub const ENV_USER_AGENT: &str = "MERCURY_USER_AGENT";
pub const ENV_LOG_LEVEL: &str = "MERCURY_LOG_LEVEL";
pub const ENV_LOG_JSON: &str = "MERCURY_LOG_JSON";

impl ClientConfig {
    /// Load configuration from a YAML file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ApiError::config(format!("Failed to read config file: {}", e)))?;

        let config: ClientConfig = serde_yaml::from_str(&content)
            .map_err(|e| ApiError::config(format!("Failed to parse config: {}", e)))?;

        config.check()?;
        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable lookup
    ///
    /// Unset variables keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = ClientConfig::default();

        if let Some(base_url) = lookup(ENV_BASE_URL) {
            config.base_url = base_url;
        }

        if let Some(timeout) = lookup(ENV_TIMEOUT_SECS) {
            config.timeout_secs = timeout.trim().parse().map_err(|e| {
                ApiError::config(format!("Invalid {} '{}': {}", ENV_TIMEOUT_SECS, timeout, e))
            })?;
        }

        if let Some(user_agent) = lookup(ENV_USER_AGENT) {
            config.user_agent = user_agent;
        }

        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            config.logging.level = level;
        }

        if let Some(json) = lookup(ENV_LOG_JSON) {
            config.logging.json = matches!(json.trim().to_lowercase().as_str(), "1" | "true" | "yes");
        }

        config.check()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn check(&self) -> Result<()> {
        self.validate()
            .map_err(|e| ApiError::config(format!("Client config error: {}", e)))
    }

    /// Convert to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| ApiError::config(format!("Failed to serialize config to YAML: {}", e)))
    }
}
