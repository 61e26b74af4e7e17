//! Top-level client

use crate::config::ClientConfig;
use crate::core::pipeline::RequestPipeline;
use crate::core::session::SessionContext;
use crate::core::transport::{HttpTransport, SessionTransport};
use crate::utils::error::{ApiError, Result};
use std::sync::Arc;
use tracing::info;
use url::Url;

/// Client for one logged-in session
///
/// Cloning is cheap and every clone shares the same session and connection
/// pool.
#[derive(Debug, Clone)]
pub struct MessengerClient {
    pub(crate) config: Arc<ClientConfig>,
    pub(crate) pipeline: RequestPipeline,
}

impl MessengerClient {
    /// Create a client that talks HTTP through a pooled `reqwest` client
    pub fn new(config: ClientConfig, session: Arc<SessionContext>) -> Result<Self> {
        config.check()?;
        ensure_same_origin(&config, &session)?;

        let transport = HttpTransport::new(&config.http_client_config())
            .map_err(|e| ApiError::config(e.to_string()))?;

        Ok(Self::with_transport(config, session, Arc::new(transport)))
    }

    /// Create a client over any transport
    pub fn with_transport(
        config: ClientConfig,
        session: Arc<SessionContext>,
        transport: Arc<dyn SessionTransport>,
    ) -> Self {
        info!(user_id = session.user_id(), base_url = %config.base_url, "Client created");

        Self {
            config: Arc::new(config),
            pipeline: RequestPipeline::new(session, transport),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &Arc<SessionContext> {
        self.pipeline.session()
    }

    pub fn pipeline(&self) -> &RequestPipeline {
        &self.pipeline
    }

    /// Absolute URL for an endpoint path
    pub fn endpoint_url(&self, path: &str) -> String {
        self.config.endpoint_url(path)
    }
}

/// Endpoints are called on the config's base URL while cookies and the
/// `Origin` header follow the session's; both must name the same origin.
fn ensure_same_origin(config: &ClientConfig, session: &SessionContext) -> Result<()> {
    let configured = Url::parse(&config.base_url).map_err(|e| {
        ApiError::config(format!("Invalid base URL '{}': {}", config.base_url, e))
    })?;

    if configured.origin() != session.base_url().origin() {
        return Err(ApiError::config(format!(
            "Config base URL '{}' does not match session base URL '{}'",
            config.base_url,
            session.base_url()
        )));
    }
    Ok(())
}
