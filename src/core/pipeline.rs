//! Authenticated request pipeline
//!
//! Form -> transport -> validator, then one notification to the caller.
//! Every endpoint wrapper goes through [`RequestPipeline::post_form`] and ends
//! in either an awaited `Result` or [`dispatch`], which turns that result into
//! exactly one callback invocation.

use crate::core::form::FormPayload;
use crate::core::session::SessionContext;
use crate::core::transport::SessionTransport;
use crate::core::validator::{self, ResponsePayload};
use crate::utils::error::{ApiError, Result};
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, error};

/// Completion callback: `None` on success, the failure otherwise
pub type Callback = Box<dyn FnOnce(Option<ApiError>) + Send + 'static>;

/// Callback used when the caller supplies none
pub fn noop_callback() -> Callback {
    Box::new(|_| {})
}

/// Shared plumbing of every endpoint wrapper
///
/// Cheap to clone; the session is borrowed by handle, never owned.
#[derive(Clone)]
pub struct RequestPipeline {
    session: Arc<SessionContext>,
    transport: Arc<dyn SessionTransport>,
}

impl RequestPipeline {
    pub fn new(session: Arc<SessionContext>, transport: Arc<dyn SessionTransport>) -> Self {
        Self { session, transport }
    }

    pub fn session(&self) -> &Arc<SessionContext> {
        &self.session
    }

    /// POST a form with the session's credentials and validate the answer
    ///
    /// The transport call is the only suspension point. A rejected transport
    /// future short-circuits: nothing is parsed.
    pub async fn post_form(&self, url: &str, form: &FormPayload) -> Result<ResponsePayload> {
        debug!(url, fields = form.len(), "Awaiting transport");
        let response = self.transport.post(url, &self.session, form).await?;

        debug!(status = response.status, "Validating response");
        validator::validate_response(&response, &self.session)
    }
}

impl fmt::Debug for RequestPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestPipeline")
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

/// Log a failed outcome under the operation's name and pass it through
pub fn log_outcome<T>(operation: &'static str, result: Result<T>) -> Result<T> {
    if let Err(err) = &result {
        error!(operation, kind = %err.kind(), "{}: {}", operation, err);
    }
    result
}

/// Deliver an outcome to a callback, exactly once
///
/// Success is signalled with `None`. Without a callback the failure is logged
/// and dropped.
pub fn notify(operation: &'static str, result: Result<()>, callback: Option<Callback>) {
    let callback = callback.unwrap_or_else(noop_callback);
    match log_outcome(operation, result) {
        Ok(()) => callback(None),
        Err(err) => callback(Some(err)),
    }
}

/// Run an operation on the runtime and report its outcome through `callback`
///
/// Returns the spawned task's handle. Outside a Tokio runtime nothing is sent:
/// the callback receives an [`ApiError::InvalidRequest`] right away and `None`
/// is returned.
pub fn dispatch<F>(
    operation: &'static str,
    task: F,
    callback: Option<Callback>,
) -> Option<JoinHandle<()>>
where
    F: Future<Output = Result<()>> + Send + 'static,
{
    match Handle::try_current() {
        Ok(handle) => Some(handle.spawn(async move {
            let result = task.await;
            notify(operation, result, callback);
        })),
        Err(e) => {
            let err = ApiError::invalid_request(format!("No Tokio runtime available: {}", e));
            notify(operation, Err(err), callback);
            None
        }
    }
}
