//! Session-carrying HTTP transport
//!
//! The pipeline only needs a single primitive: POST a form with the session's
//! credentials attached and hand back whatever the server said. Deciding
//! whether that answer is a success belongs to the response validator, so a
//! transport returns every completed exchange, whatever its status.

mod http;

pub use http::{HttpClientConfig, HttpTransport};

use crate::core::form::FormPayload;
use crate::core::session::SessionContext;
use crate::utils::error::TransportError;
use async_trait::async_trait;

/// A completed HTTP exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    /// `Location` header of a redirect, if any
    pub location: Option<String>,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            location: None,
            body: body.into(),
        }
    }

    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(200, body)
    }

    pub fn redirect(status: u16, location: impl Into<String>) -> Self {
        Self {
            status,
            location: Some(location.into()),
            body: String::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_redirect(&self) -> bool {
        (300..400).contains(&self.status)
    }
}

/// POST primitive consumed by the request pipeline
///
/// Implementations attach the session's cookies, return the raw body for any
/// completed exchange and report only unrecoverable faults (DNS, reset,
/// timeout) as errors.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionTransport: Send + Sync {
    async fn post(
        &self,
        url: &str,
        session: &SessionContext,
        form: &FormPayload,
    ) -> Result<RawResponse, TransportError>;
}
