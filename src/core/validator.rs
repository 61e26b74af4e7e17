//! Response validation
//!
//! Turns a raw exchange into either a parsed payload or one of the three
//! failure kinds. The order of the checks matters: an expired session is
//! answered with a login page that cannot be parsed as an envelope, so expiry
//! is detected before any parse and before the `error` field is looked at.

use crate::core::envelope;
use crate::core::session::SessionContext;
use crate::core::transport::RawResponse;
use crate::utils::error::{ApiError, Result, TransportError};
use serde_json::Value;
use tracing::{debug, warn};

/// Parsed body of an accepted response
#[derive(Debug, Clone, PartialEq)]
pub struct ResponsePayload(Value);

impl ResponsePayload {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn value(&self) -> &Value {
        &self.0
    }

    pub fn into_inner(self) -> Value {
        self.0
    }
}

/// Validate an exchange without touching any session
pub fn validate(response: &RawResponse) -> Result<ResponsePayload> {
    validate_inner(response, None)
}

/// Validate an exchange and apply credential rotations it announces
pub fn validate_response(response: &RawResponse, session: &SessionContext) -> Result<ResponsePayload> {
    validate_inner(response, Some(session))
}

fn validate_inner(response: &RawResponse, session: Option<&SessionContext>) -> Result<ResponsePayload> {
    // Login pages and login redirects, before anything is parsed
    if let Some(reason) = envelope::detect_login_page(response) {
        warn!(status = response.status, "{}", reason);
        return Err(ApiError::login_expired(reason));
    }

    if !response.is_success() {
        return Err(TransportError::HttpStatus {
            status: response.status,
            body: response.body.clone(),
        }
        .into());
    }

    let payload = envelope::parse_body(&response.body)?;

    // Expiry reported inside a well-formed envelope
    if let Some(reason) = envelope::detect_login_required(&payload) {
        warn!("{}", reason);
        return Err(ApiError::login_expired(reason));
    }

    if let Some(session) = session {
        let refresh = envelope::extract_refresh(&payload);
        session.apply_refresh(&refresh);
    }

    if let Some(failing) = envelope::find_error(&payload) {
        let code = failing.get("error").unwrap_or(&Value::Null);
        debug!(error = %code, "Backend rejected request");
        return Err(ApiError::application(payload));
    }

    Ok(ResponsePayload(payload))
}
