//! Configuration data models

use crate::core::session::DEFAULT_BASE_URL;
use crate::core::transport::HttpClientConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default backend origin
pub fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

/// Default request timeout in seconds
pub fn default_timeout_secs() -> u64 {
    60
}

/// Default user agent
pub fn default_user_agent() -> String {
    concat!("mercury-rs/", env!("CARGO_PKG_VERSION")).to_string()
}

/// Default idle connection lifetime in seconds
pub fn default_pool_idle_timeout_secs() -> u64 {
    90
}

/// Default idle connections kept per host
pub fn default_pool_max_idle_per_host() -> usize {
    16
}

/// Default log level
pub fn default_log_level() -> String {
    "info".to_string()
}

/// Client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Backend origin every endpoint path is joined to
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_pool_idle_timeout_secs")]
    pub pool_idle_timeout_secs: u64,
    #[serde(default = "default_pool_max_idle_per_host")]
    pub pool_max_idle_per_host: usize,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            pool_idle_timeout_secs: default_pool_idle_timeout_secs(),
            pool_max_idle_per_host: default_pool_max_idle_per_host(),
            logging: LoggingConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Settings for the HTTP transport
    pub fn http_client_config(&self) -> HttpClientConfig {
        HttpClientConfig {
            timeout: Duration::from_secs(self.timeout_secs),
            user_agent: self.user_agent.clone(),
            pool_idle_timeout: Duration::from_secs(self.pool_idle_timeout_secs),
            pool_max_idle_per_host: self.pool_max_idle_per_host,
        }
    }

    /// Absolute URL of an endpoint path
    pub fn endpoint_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Level or `EnvFilter` directive; `RUST_LOG` takes precedence
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}
