//! Client SDK
//!
//! [`MessengerClient`] owns the configuration and a handle to the logged-in
//! session; endpoint wrappers are methods on it.

pub mod client;
pub mod threads;

pub use client::MessengerClient;
pub use threads::{CHANGE_ARCHIVED_STATUS_OPERATION, CHANGE_ARCHIVED_STATUS_PATH};
