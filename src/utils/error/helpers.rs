//! Helper functions for creating and classifying errors

use super::types::{ApiError, ApplicationError, ErrorKind, TransportError};
use serde_json::Value;

impl ApiError {
    pub fn login_expired<S: Into<String>>(message: S) -> Self {
        Self::LoginExpired(message.into())
    }

    pub fn application(payload: Value) -> Self {
        Self::Application(ApplicationError::new(payload))
    }

    pub fn invalid_request<S: Into<String>>(message: S) -> Self {
        Self::InvalidRequest(message.into())
    }

    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::LoginExpired(_) => ErrorKind::LoginExpired,
            ApiError::Application(_) => ErrorKind::Application,
            ApiError::Transport(_) => ErrorKind::Transport,
            ApiError::InvalidRequest(_) => ErrorKind::InvalidRequest,
            ApiError::Config(_) => ErrorKind::Config,
        }
    }

    /// Only transport faults may succeed on a later attempt; the pipeline itself
    /// never retries.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Transport(TransportError::HttpStatus { status, .. }) => *status >= 500,
            ApiError::Transport(TransportError::InvalidRequest(_)) => false,
            ApiError::Transport(_) => true,
            _ => false,
        }
    }

    pub fn is_login_expired(&self) -> bool {
        matches!(self, ApiError::LoginExpired(_))
    }

    /// Backend payload for application errors
    pub fn payload(&self) -> Option<&Value> {
        match self {
            ApiError::Application(error) => Some(error.payload()),
            _ => None,
        }
    }
}

impl TransportError {
    pub fn network<S: Into<String>>(message: S) -> Self {
        Self::Network(message.into())
    }

    pub fn timeout<S: Into<String>>(message: S) -> Self {
        Self::Timeout(message.into())
    }

    pub fn malformed<D: Into<String>, B: Into<String>>(detail: D, body: B) -> Self {
        Self::Malformed {
            detail: detail.into(),
            body: body.into(),
        }
    }
}
