//! Transport failure taxonomy.
//!
//! ERROR HANDLING
//! ==============
//! Every failure collapses to a human-readable message at the store boundary
//! via `Display`. `Remote` displays the server-supplied message verbatim so
//! the UI shows exactly what the service said.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The service answered with a non-success HTTP status.
    #[error("{message}")]
    Remote { status: u16, message: String },

    /// The request never produced a response (unreachable, timeout, reset).
    #[error("network error: {0}")]
    Transport(String),

    /// The response body was not the expected JSON shape.
    #[error("invalid response body: {0}")]
    Decode(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// A local file could not be read for upload.
    #[error("cannot read {path}: {reason}")]
    File { path: String, reason: String },
}

impl ApiError {
    /// Build a `Remote` error from a failed response body, preferring the
    /// server's `detail` string and falling back to `fallback(status)`.
    pub fn remote(status: u16, body: &str, fallback: fn(u16) -> String) -> Self {
        let message = detail_from_body(body).unwrap_or_else(|| fallback(status));
        Self::Remote { status, message }
    }

    /// HTTP status for `Remote` failures.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub(crate) fn request_failed_message(status: u16) -> String {
    format!("request failed: {status}")
}

pub(crate) fn upload_failed_message(status: u16) -> String {
    format!("upload failed: {status}")
}

/// Extract a non-empty string `detail` field from a JSON error body.
fn detail_from_body(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let detail = value.get("detail")?.as_str()?.trim();
    if detail.is_empty() {
        None
    } else {
        Some(detail.to_owned())
    }
}
