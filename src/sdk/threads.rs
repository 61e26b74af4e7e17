//! Thread management endpoints

use super::client::MessengerClient;
use crate::core::form::{FormPayload, Identifiers, build_indexed_form};
use crate::core::pipeline::{self, Callback};
use crate::utils::error::{ApiError, Result};
use tokio::task::JoinHandle;
use tracing::debug;

/// Endpoint that archives or unarchives threads
pub const CHANGE_ARCHIVED_STATUS_PATH: &str = "/ajax/mercury/change_archived_status.php";

/// Name failures of this operation are logged under
pub const CHANGE_ARCHIVED_STATUS_OPERATION: &str = "changeArchivedStatus";

/// List-style parameter holding the thread ids
const THREAD_IDS_PARAM: &str = "ids";

/// Form for an archive status change: `ids[<thread>] = archive` per thread
///
/// An empty id list is rejected; nothing would be sent for it.
pub fn archived_status_form(threads: Identifiers, archive: bool) -> Result<FormPayload> {
    if threads.is_empty() {
        return Err(ApiError::invalid_request(
            "changeArchivedStatus needs at least one thread id",
        ));
    }
    Ok(build_indexed_form(THREAD_IDS_PARAM, threads.iter(), archive))
}

impl MessengerClient {
    /// Set the archive status of one or more threads
    ///
    /// Archiving hides a thread from the inbox until the next message is sent
    /// or received in it. Accepts a single id or a list of ids.
    ///
    /// ```rust,no_run
    /// # async fn example(client: mercury_rs::MessengerClient) -> mercury_rs::Result<()> {
    /// client.change_archived_status("000000000000000", true).await?;
    /// client.change_archived_status(vec!["10", "20"], false).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn change_archived_status(
        &self,
        threads: impl Into<Identifiers>,
        archive: bool,
    ) -> Result<()> {
        let result = self.send_archived_status(threads.into(), archive).await;
        pipeline::log_outcome(CHANGE_ARCHIVED_STATUS_OPERATION, result)
    }

    /// Callback flavour of [`change_archived_status`](Self::change_archived_status)
    ///
    /// The request runs on the current Tokio runtime and `callback` is invoked
    /// exactly once: with `None` on success, with the error otherwise. Passing
    /// `None` makes the call fire-and-forget; failures are then only logged.
    /// Called outside a runtime, nothing is sent, the callback gets an
    /// [`ApiError::InvalidRequest`] immediately and no handle is returned.
    pub fn change_archived_status_with_callback(
        &self,
        threads: impl Into<Identifiers>,
        archive: bool,
        callback: Option<Callback>,
    ) -> Option<JoinHandle<()>> {
        let client = self.clone();
        let threads = threads.into();
        pipeline::dispatch(
            CHANGE_ARCHIVED_STATUS_OPERATION,
            async move { client.send_archived_status(threads, archive).await },
            callback,
        )
    }

    async fn send_archived_status(&self, threads: Identifiers, archive: bool) -> Result<()> {
        let form = archived_status_form(threads, archive)?;
        debug!(threads = form.len(), archive, "Changing archived status");

        let url = self.endpoint_url(CHANGE_ARCHIVED_STATUS_PATH);
        self.pipeline.post_form(&url, &form).await?;
        Ok(())
    }
}
