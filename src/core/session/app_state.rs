//! Persisted login state
//!
//! A previous login leaves behind its cookies as a JSON array of
//! `{key, value, domain, path, ...}` objects. Loading it restores the session
//! without going through the login flow again.

use crate::utils::error::{ApiError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

/// Name of the cookie carrying the logged-in user's id
pub const USER_ID_COOKIE: &str = "c_user";

/// One persisted cookie
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppStateCookie {
    pub key: String,
    pub value: String,
    pub domain: String,
    #[serde(default = "default_path")]
    pub path: String,
    #[serde(default, rename = "hostOnly")]
    pub host_only: bool,
}

fn default_path() -> String {
    "/".to_string()
}

impl AppStateCookie {
    /// `Set-Cookie` style string accepted by the cookie jar
    pub fn to_cookie_string(&self) -> String {
        if self.host_only {
            format!("{}={}; Path={}", self.key, self.value, self.path)
        } else {
            format!(
                "{}={}; Domain={}; Path={}",
                self.key, self.value, self.domain, self.path
            )
        }
    }

    /// URL the cookie is stored against
    pub fn origin(&self) -> Result<Url> {
        let host = self.domain.trim_start_matches('.');
        Url::parse(&format!("https://{}{}", host, self.path)).map_err(|e| {
            ApiError::config(format!(
                "Invalid domain '{}' for cookie '{}': {}",
                self.domain, self.key, e
            ))
        })
    }
}

/// The full cookie set of a logged-in session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppState {
    cookies: Vec<AppStateCookie>,
}

impl AppState {
    pub fn new(cookies: Vec<AppStateCookie>) -> Self {
        Self { cookies }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| ApiError::config(format!("Failed to parse app state: {}", e)))
    }

    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            ApiError::config(format!(
                "Failed to read app state file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json(&content)
    }

    pub fn cookies(&self) -> &[AppStateCookie] {
        &self.cookies
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    /// Value of the `c_user` cookie, if present
    pub fn user_id(&self) -> Option<&str> {
        self.cookies
            .iter()
            .find(|c| c.key == USER_ID_COOKIE)
            .map(|c| c.value.as_str())
    }
}
