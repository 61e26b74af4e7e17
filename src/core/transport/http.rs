//! reqwest-backed transport

use super::{RawResponse, SessionTransport};
use crate::core::form::FormPayload;
use crate::core::session::SessionContext;
use crate::utils::error::TransportError;
use async_trait::async_trait;
use reqwest::header::{COOKIE, LOCATION, ORIGIN, REFERER};
use reqwest::{Client, redirect};
use std::time::Duration;
use tracing::{debug, trace};
use url::Url;

/// Configuration for the underlying HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    pub timeout: Duration,
    pub user_agent: String,
    pub pool_idle_timeout: Duration,
    pub pool_max_idle_per_host: usize,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            user_agent: concat!("mercury-rs/", env!("CARGO_PKG_VERSION")).to_string(),
            pool_idle_timeout: Duration::from_secs(90),
            pool_max_idle_per_host: 16,
        }
    }
}

/// Transport over a pooled `reqwest::Client`
///
/// Cookies are not bound to the client: they are read from and written back
/// to the jar of whichever session the request belongs to. Redirects are not
/// followed so a bounce to the login page stays visible to the validator.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(config: &HttpClientConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .redirect(redirect::Policy::none())
            .build()
            .map_err(|e| {
                TransportError::InvalidRequest(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { client })
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl SessionTransport for HttpTransport {
    async fn post(
        &self,
        url: &str,
        session: &SessionContext,
        form: &FormPayload,
    ) -> Result<RawResponse, TransportError> {
        let target = Url::parse(url)
            .map_err(|e| TransportError::InvalidRequest(format!("Invalid URL '{}': {}", url, e)))?;

        let mut body = form.clone();
        body.merge_missing(&session.signing_fields());

        let origin = session.base_url().origin().ascii_serialization();
        let mut request = self
            .client
            .post(target.clone())
            .header(ORIGIN, origin.as_str())
            .header(REFERER, session.base_url().as_str())
            .form(&body.to_pairs());

        if let Some(cookies) = session.cookie_header(&target) {
            request = request.header(COOKIE, cookies);
        }

        debug!(url = %target, fields = body.len(), "POST");

        let response = request.send().await?;
        let status = response.status().as_u16();

        session.store_response_cookies(&target, response.headers());

        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = response.text().await?;
        trace!(status, bytes = body.len(), "Response received");

        Ok(RawResponse {
            status,
            location,
            body,
        })
    }
}
