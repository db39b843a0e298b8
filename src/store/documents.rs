//! Document session store.
//!
//! DESIGN
//! ======
//! Upload progress is a client-side heuristic: while the upload call is
//! outstanding a ticker adds [`UPLOAD_PROGRESS_STEP`] every [`UPLOAD_TICK`]
//! up to [`UPLOAD_PROGRESS_CAP`]. The ticker lives inside the upload future,
//! so it stops with it on every exit path.
//!
//! Only one upload lifecycle may be active per store. Dropping the `upload`
//! future before it finishes releases the lifecycle back to idle.
//! Overlapping `fetch` and `remove` calls are not serialized: whichever
//! resolves last decides the final snapshot.
//!
//! [`UPLOAD_PROGRESS_STEP`]: crate::state::documents::UPLOAD_PROGRESS_STEP

#[cfg(test)]
#[path = "documents_test.rs"]
mod documents_test;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior};

use super::StoreError;
use crate::net::api::RemoteApi;
use crate::net::types::{DeleteAck, UploadAck};
use crate::net::upload::UploadFile;
use crate::state::documents::{DocumentsEvent, DocumentsState, UPLOAD_PROGRESS_CAP};

/// Interval between simulated progress ticks.
pub const UPLOAD_TICK: Duration = Duration::from_millis(200);
/// How long a finished upload stays at 100% before resetting.
pub const UPLOAD_HOLD: Duration = Duration::from_secs(1);

/// Owner of the document-list state.
#[derive(Clone)]
pub struct DocumentStore {
    api: Arc<dyn RemoteApi>,
    state: Arc<watch::Sender<DocumentsState>>,
}

impl DocumentStore {
    /// Create a store in the initial loading state without fetching.
    pub fn new(api: Arc<dyn RemoteApi>) -> Self {
        let (state, _) = watch::channel(DocumentsState::default());
        Self { api, state: Arc::new(state) }
    }

    /// Create a store and start the initial fetch in the background.
    ///
    /// Must be called from within a tokio runtime.
    pub fn mount(api: Arc<dyn RemoteApi>) -> Self {
        let store = Self::new(api);
        let initial = store.clone();
        tokio::spawn(async move { initial.fetch().await });
        store
    }

    /// Current state.
    #[must_use]
    pub fn snapshot(&self) -> DocumentsState {
        self.state.borrow().clone()
    }

    /// Receiver woken on every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<DocumentsState> {
        self.state.subscribe()
    }

    /// Number of documents in the current snapshot.
    #[must_use]
    pub fn count(&self) -> usize {
        self.state.borrow().count()
    }

    fn dispatch(&self, event: DocumentsEvent) {
        apply(&self.state, event);
    }

    /// Refresh the collection from the server.
    ///
    /// Failures are recorded in `error`; the previous snapshot stays.
    pub async fn fetch(&self) {
        self.dispatch(DocumentsEvent::FetchStarted);
        match self.api.list_documents().await {
            Ok(documents) => {
                tracing::debug!(count = documents.len(), "documents fetched");
                self.dispatch(DocumentsEvent::FetchSucceeded(documents));
            }
            Err(e) => {
                tracing::warn!(error = %e, "document fetch failed");
                self.dispatch(DocumentsEvent::FetchFailed(e.to_string()));
            }
        }
    }

    /// Upload a file, driving the progress lifecycle, then refresh the list.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UploadInProgress`] if another upload is active,
    /// or the remote failure (also recorded in `error`).
    pub async fn upload(&self, file: UploadFile) -> Result<UploadAck, StoreError> {
        if !self.begin_upload() {
            return Err(StoreError::UploadInProgress);
        }
        let claim = UploadClaim { state: &self.state, released: false };
        let name = file.name.clone();

        let request = self.api.upload_document(file);
        tokio::pin!(request);
        let mut ticker = tokio::time::interval_at(Instant::now() + UPLOAD_TICK, UPLOAD_TICK);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let result = loop {
            tokio::select! {
                result = &mut request => break result,
                _ = ticker.tick() => {
                    let capped = self.state.borrow().upload.progress >= UPLOAD_PROGRESS_CAP;
                    if !capped {
                        self.dispatch(DocumentsEvent::UploadTick);
                    }
                }
            }
        };

        match result {
            Ok(ack) => {
                tracing::info!(filename = %ack.filename, "document uploaded");
                self.dispatch(DocumentsEvent::UploadSucceeded);
                let settle = async {
                    tokio::time::sleep(UPLOAD_HOLD).await;
                    self.dispatch(DocumentsEvent::UploadSettled);
                };
                tokio::join!(settle, self.fetch());
                claim.release();
                Ok(ack)
            }
            Err(e) => {
                tracing::warn!(%name, error = %e, "document upload failed");
                self.dispatch(DocumentsEvent::UploadFailed(e.to_string()));
                claim.release();
                Err(e.into())
            }
        }
    }

    /// Atomically claim the upload lifecycle. Returns `false` if one is
    /// already active.
    fn begin_upload(&self) -> bool {
        self.state.send_if_modified(|state| {
            if state.is_uploading() {
                return false;
            }
            *state = std::mem::take(state).reduce(DocumentsEvent::UploadStarted);
            true
        })
    }

    /// Delete a document, then refresh the list.
    ///
    /// # Errors
    ///
    /// Returns the remote failure (also recorded in `error`).
    pub async fn remove(&self, id: &str) -> Result<DeleteAck, StoreError> {
        self.dispatch(DocumentsEvent::RemoveStarted);
        match self.api.delete_document(id).await {
            Ok(ack) => {
                tracing::info!(%id, "document deleted");
                self.fetch().await;
                Ok(ack)
            }
            Err(e) => {
                tracing::warn!(%id, error = %e, "document delete failed");
                self.dispatch(DocumentsEvent::RemoveFailed(e.to_string()));
                Err(e.into())
            }
        }
    }
}

fn apply(state: &watch::Sender<DocumentsState>, event: DocumentsEvent) {
    state.send_modify(|state| *state = std::mem::take(state).reduce(event));
}

/// Ownership of the active upload lifecycle. Dropped unreleased, it resets
/// the lifecycle to idle.
struct UploadClaim<'a> {
    state: &'a watch::Sender<DocumentsState>,
    released: bool,
}

impl UploadClaim<'_> {
    fn release(mut self) {
        self.released = true;
    }
}

impl Drop for UploadClaim<'_> {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        tracing::warn!("upload dropped before completion");
        apply(self.state, DocumentsEvent::UploadSettled);
    }
}
