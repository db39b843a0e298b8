//! File payloads for `POST /api/upload`.

#[cfg(test)]
#[path = "upload_test.rs"]
mod upload_test;

use std::path::Path;

use super::error::ApiError;

/// Extensions the document picker offers. The server remains the authority
/// on what it accepts.
pub const ACCEPTED_EXTENSIONS: [&str; 4] = ["pdf", "txt", "docx", "md"];

const DEFAULT_MIME: &str = "application/octet-stream";

/// A file ready to be sent as the multipart `file` field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    pub bytes: Vec<u8>,
    pub mime: String,
}

impl UploadFile {
    /// Build a payload from in-memory bytes, inferring the MIME type from the
    /// file name.
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let mime = mime_for_name(&name).to_owned();
        Self { name, bytes, mime }
    }

    /// Read a file from disk.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::File`] if the path has no file name or cannot be
    /// read.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, ApiError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| ApiError::File { path: display.clone(), reason: "missing file name".into() })?
            .to_owned();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| ApiError::File { path: display, reason: e.to_string() })?;
        Ok(Self::new(name, bytes))
    }

    /// Lower-cased extension without the dot, if any.
    #[must_use]
    pub fn extension(&self) -> Option<String> {
        extension_of(&self.name)
    }

    #[must_use]
    pub fn has_accepted_extension(&self) -> bool {
        self.extension()
            .is_some_and(|ext| ACCEPTED_EXTENSIONS.contains(&ext.as_str()))
    }
}

fn extension_of(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
}

fn mime_for_name(name: &str) -> &'static str {
    match extension_of(name).as_deref() {
        Some("pdf") => "application/pdf",
        Some("txt") => "text/plain",
        Some("md") => "text/markdown",
        Some("docx") => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        _ => DEFAULT_MIME,
    }
}
