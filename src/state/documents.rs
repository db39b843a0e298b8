//! Document-list state and upload lifecycle.
//!
//! DESIGN
//! ======
//! The collection is only ever replaced wholesale by a successful fetch.
//! Failures leave the last snapshot in place (stale but available) and
//! record the message in `error`.

#[cfg(test)]
#[path = "documents_test.rs"]
mod documents_test;

use crate::net::types::Document;

/// Progress added on every simulated upload tick.
pub const UPLOAD_PROGRESS_STEP: u8 = 10;
/// Simulated progress never passes this value until the server answers.
pub const UPLOAD_PROGRESS_CAP: u8 = 90;
pub const UPLOAD_PROGRESS_COMPLETE: u8 = 100;

/// Transient upload indicator: in-progress flag and estimate in `0..=100`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UploadLifecycle {
    pub in_progress: bool,
    pub progress: u8,
}

/// State transitions applied by the document store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DocumentsEvent {
    FetchStarted,
    FetchSucceeded(Vec<Document>),
    FetchFailed(String),
    UploadStarted,
    /// Simulated progress tick while the upload call is outstanding.
    UploadTick,
    /// Server accepted the file; progress jumps to 100 and is held.
    UploadSucceeded,
    /// Display hold elapsed after a successful upload.
    UploadSettled,
    UploadFailed(String),
    RemoveStarted,
    RemoveFailed(String),
}

/// Local view of the remote document collection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocumentsState {
    /// Snapshot from the last successful fetch, in server order.
    pub documents: Vec<Document>,
    pub loading: bool,
    pub error: Option<String>,
    pub upload: UploadLifecycle,
}

impl Default for DocumentsState {
    /// Starts in the loading state so the first render shows a spinner rather
    /// than an empty list.
    fn default() -> Self {
        Self { documents: Vec::new(), loading: true, error: None, upload: UploadLifecycle::default() }
    }
}

impl DocumentsState {
    /// Apply one event and return the next state.
    #[must_use]
    pub fn reduce(mut self, event: DocumentsEvent) -> Self {
        match event {
            DocumentsEvent::FetchStarted => {
                self.loading = true;
                self.error = None;
            }
            DocumentsEvent::FetchSucceeded(documents) => {
                self.documents = documents;
                self.loading = false;
            }
            DocumentsEvent::FetchFailed(message) => {
                self.error = Some(message);
                self.loading = false;
            }
            DocumentsEvent::UploadStarted => {
                self.error = None;
                self.upload = UploadLifecycle { in_progress: true, progress: 0 };
            }
            DocumentsEvent::UploadTick => {
                if self.upload.in_progress && self.upload.progress < UPLOAD_PROGRESS_CAP {
                    self.upload.progress = self
                        .upload
                        .progress
                        .saturating_add(UPLOAD_PROGRESS_STEP)
                        .min(UPLOAD_PROGRESS_CAP);
                }
            }
            DocumentsEvent::UploadSucceeded => {
                self.upload = UploadLifecycle { in_progress: true, progress: UPLOAD_PROGRESS_COMPLETE };
            }
            DocumentsEvent::UploadSettled => {
                self.upload = UploadLifecycle::default();
            }
            DocumentsEvent::UploadFailed(message) => {
                self.upload = UploadLifecycle::default();
                self.error = Some(message);
            }
            DocumentsEvent::RemoveStarted => {
                self.error = None;
            }
            DocumentsEvent::RemoveFailed(message) => {
                self.error = Some(message);
            }
        }
        self
    }

    /// Number of documents in the current snapshot.
    #[must_use]
    pub fn count(&self) -> usize {
        self.documents.len()
    }

    #[must_use]
    pub fn is_uploading(&self) -> bool {
        self.upload.in_progress
    }

    /// Documents whose name contains `query`, case-insensitively. A blank
    /// query matches everything.
    #[must_use]
    pub fn matching(&self, query: &str) -> Vec<&Document> {
        let needle = query.trim().to_lowercase();
        self.documents
            .iter()
            .filter(|doc| needle.is_empty() || doc.name.to_lowercase().contains(&needle))
            .collect()
    }
}

/// Human-readable byte size (`"512 B"`, `"1.5 KB"`, `"2.0 MB"`).
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1} {}", UNITS[unit])
}
