//! Error types for the request pipeline

use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Result type alias for the client
pub type Result<T> = std::result::Result<T, ApiError>;

/// Faults raised below the envelope: network, status and parse failures
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransportError {
    /// Connection, DNS or TLS failure
    #[error("Network error: {0}")]
    Network(String),

    /// The request did not complete before the configured deadline
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// The backend answered with a status the pipeline does not accept
    #[error("Unexpected HTTP status {status}")]
    HttpStatus { status: u16, body: String },

    /// The body could not be parsed as an envelope
    #[error("Malformed response: {detail}")]
    Malformed { detail: String, body: String },

    /// The outgoing request could not be built
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            TransportError::Timeout(error.to_string())
        } else if error.is_builder() {
            TransportError::InvalidRequest(error.to_string())
        } else {
            TransportError::Network(error.to_string())
        }
    }
}

/// Application-level rejection reported by the backend
///
/// The whole parsed payload is kept so the backend's code, summary and any
/// sibling diagnostic fields reach the caller untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplicationError {
    payload: Value,
}

impl ApplicationError {
    pub fn new(payload: Value) -> Self {
        Self { payload }
    }

    /// The full parsed response
    pub fn payload(&self) -> &Value {
        &self.payload
    }

    pub fn into_payload(self) -> Value {
        self.payload
    }

    /// Value of the `error` field of the (first failing) envelope
    pub fn error_code(&self) -> Option<&Value> {
        self.envelope().and_then(|e| e.get("error"))
    }

    pub fn summary(&self) -> Option<&str> {
        self.envelope()
            .and_then(|e| e.get("errorSummary"))
            .and_then(Value::as_str)
    }

    pub fn description(&self) -> Option<&str> {
        self.envelope()
            .and_then(|e| e.get("errorDescription"))
            .and_then(Value::as_str)
    }

    fn envelope(&self) -> Option<&Value> {
        match &self.payload {
            Value::Array(items) => items.iter().find(|item| item.get("error").is_some()),
            other => Some(other),
        }
    }
}

impl fmt::Display for ApplicationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.error_code() {
            Some(code) => write!(f, "error {}", code)?,
            None => write!(f, "error")?,
        }
        if let Some(summary) = self.summary() {
            write!(f, " ({})", summary)?;
        }
        Ok(())
    }
}

/// Main error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// The session is no longer valid and the caller must log in again
    #[error("Not logged in: {0}")]
    LoginExpired(String),

    /// The backend explicitly rejected the request
    #[error("Application error: {0}")]
    Application(ApplicationError),

    /// Network or parse failure, potentially transient
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// The caller's input was rejected before anything was sent
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Discriminant of [`ApiError`], handy for logging and matching in tests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    LoginExpired,
    Application,
    Transport,
    InvalidRequest,
    Config,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::LoginExpired => "login_expired",
            ErrorKind::Application => "application_error",
            ErrorKind::Transport => "transport_error",
            ErrorKind::InvalidRequest => "invalid_request",
            ErrorKind::Config => "config_error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
