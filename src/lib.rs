//! # mercury-rs
//!
//! Async client for the session-protected Messenger web endpoints.
//!
//! Every endpoint wrapper shares one authenticated request pipeline:
//!
//! - **Form building**: a single id or a list of ids becomes `ids[<id>]=<value>`
//!   form fields.
//! - **Session transport**: the form is POSTed with the session's cookies and
//!   request-signing fields (`fb_dtsg`, `jazoest`).
//! - **Response validation**: login pages and "not logged in" envelopes become
//!   [`ApiError::LoginExpired`], `error` envelopes become
//!   [`ApiError::Application`] carrying the full payload, and network or parse
//!   faults become [`ApiError::Transport`].
//! - **Call normalization**: each call ends in exactly one outcome, either an
//!   awaited `Result` or a single callback invocation.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mercury_rs::{AppState, ClientConfig, MessengerClient, SessionContext};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let app_state = AppState::from_file("appstate.json").await?;
//!     let session = SessionContext::builder()
//!         .app_state(app_state)
//!         .fb_dtsg("AQH...")
//!         .build()?;
//!
//!     let client = MessengerClient::new(ClientConfig::default(), Arc::new(session))?;
//!     client.change_archived_status("000000000000000", true).await?;
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]

pub mod config;
pub mod core;
pub mod sdk;
pub mod utils;

pub use config::{ClientConfig, ConfigBuilder, LoggingConfig};
pub use core::form::{FormPayload, FormValue, Identifier, Identifiers};
pub use core::pipeline::{Callback, RequestPipeline};
pub use core::session::{AppState, SessionContext};
pub use core::transport::{HttpTransport, RawResponse, SessionTransport};
pub use sdk::MessengerClient;
pub use utils::error::{ApiError, ApplicationError, ErrorKind, Result, TransportError};

/// Build metadata embedded by `build.rs`
pub mod build_info {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const GIT_HASH: &str = env!("GIT_HASH");
    pub const BUILD_TIME: &str = env!("BUILD_TIME");
    pub const RUST_VERSION: &str = env!("RUST_VERSION");
}
