//! Core request pipeline
//!
//! Leaves first: form building, session state, transport, envelope parsing,
//! response validation, and the pipeline that ties them together.

pub mod envelope;
pub mod form;
pub mod pipeline;
pub mod session;
pub mod transport;
pub mod validator;

pub use form::{FormPayload, FormValue, Identifier, Identifiers, build_indexed_form};
pub use pipeline::{Callback, RequestPipeline, dispatch, noop_callback};
pub use session::{AppState, SessionBuilder, SessionContext};
pub use transport::{HttpClientConfig, HttpTransport, RawResponse, SessionTransport};
pub use validator::{ResponsePayload, validate_response};
