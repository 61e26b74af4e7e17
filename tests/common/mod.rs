//! Common test utilities for mercury-rs
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::common::TestBackend;
//!
//! #[tokio::test]
//! async fn my_test() {
//!     let backend = TestBackend::start().await;
//!     backend.client.change_archived_status("10", true).await.unwrap();
//! }
//! ```

pub mod fixtures;

pub use fixtures::*;

use mercury_rs::{ClientConfig, ConfigBuilder, MessengerClient, SessionContext};
use std::sync::Arc;
use wiremock::MockServer;

/// User id of the test session
pub const TEST_USER_ID: &str = "100004";

/// Signing token of the test session
pub const TEST_FB_DTSG: &str = "AQHtest";

/// A local backend plus a client logged in against it
pub struct TestBackend {
    pub server: MockServer,
    pub session: Arc<SessionContext>,
    pub client: MessengerClient,
}

impl TestBackend {
    pub async fn start() -> Self {
        Self::start_with(|builder| builder).await
    }

    /// Start with a customised configuration
    pub async fn start_with<F>(configure: F) -> Self
    where
        F: FnOnce(ConfigBuilder) -> ConfigBuilder,
    {
        let server = MockServer::start().await;
        let config = configure(ConfigBuilder::new().base_url(server.uri()))
            .build()
            .expect("valid test config");
        let session = test_session(&config);
        let client =
            MessengerClient::new(config, session.clone()).expect("client for test backend");

        Self {
            server,
            session,
            client,
        }
    }

    /// Bodies of every request the backend received, in order
    pub async fn received_bodies(&self) -> Vec<String> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .map(|request| String::from_utf8_lossy(&request.body).into_owned())
            .collect()
    }
}

/// Session with a user id, a token and one cookie for the backend
pub fn test_session(config: &ClientConfig) -> Arc<SessionContext> {
    Arc::new(
        SessionContext::builder()
            .base_url(config.base_url.clone())
            .cookie(format!("c_user={}", TEST_USER_ID))
            .cookie("xs=session-secret")
            .fb_dtsg(TEST_FB_DTSG)
            .build()
            .expect("valid test session"),
    )
}
