//! Error handling
//!
//! Every failure a request can end in is one of the variants of [`ApiError`].
//! Transport faults are kept in their own enum so callers can decide whether a
//! retry is worth it.

mod helpers;
mod types;


pub use types::{ApiError, ApplicationError, ErrorKind, Result, TransportError};
