//! REST client for the remote document/chat service.
//!
//! DESIGN
//! ======
//! `RemoteApi` is the seam the session stores depend on; `ApiClient` is the
//! reqwest-backed implementation. Every call is single-shot: no retries, no
//! caching. Non-success statuses become [`ApiError::Remote`] with the
//! server's `detail` string when it sends one.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::time::Duration;

use reqwest::Url;
use serde::de::DeserializeOwned;

use super::error::{ApiError, request_failed_message, upload_failed_message};
use super::types::{ChatReply, ChatRequest, DeleteAck, Document, HealthStatus, UploadAck};
use super::upload::UploadFile;
use crate::config::ClientConfig;

const DOCUMENTS_PATH: &str = "/api/documents";
const UPLOAD_PATH: &str = "/api/upload";
const CHAT_PATH: &str = "/api/chat";
const HEALTH_PATH: &str = "/api/health";

/// Operations the session stores need from the remote service.
#[async_trait::async_trait]
pub trait RemoteApi: Send + Sync {
    /// Fetch the full document collection.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure, non-success status, or a
    /// malformed body.
    async fn list_documents(&self) -> Result<Vec<Document>, ApiError>;

    /// Upload one file as multipart field `file`.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`], including server-side type or size rejections.
    async fn upload_document(&self, file: UploadFile) -> Result<UploadAck, ApiError>;

    /// Delete a document by identifier.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`], including not-found.
    async fn delete_document(&self, id: &str) -> Result<DeleteAck, ApiError>;

    /// Send a user message with its prior conversation.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on any failure.
    async fn send_chat_message(&self, request: &ChatRequest) -> Result<ChatReply, ApiError>;

    /// Probe service status.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on any failure.
    async fn health_check(&self) -> Result<HealthStatus, ApiError>;
}

/// reqwest-backed [`RemoteApi`].
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client for the configured base address.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::HttpClientBuild`] if the HTTP client fails to build.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| ApiError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: config.base_url.trim_end_matches('/').to_owned() })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `{base}/api/documents/{id}` with `id` percent-encoded as one segment.
    fn document_url(&self, id: &str) -> Result<Url, ApiError> {
        let mut url = Url::parse(&self.url(DOCUMENTS_PATH)).map_err(|e| ApiError::Transport(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| ApiError::Transport(format!("base URL cannot carry a path: {}", self.base_url)))?
            .push(id);
        Ok(url)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, ApiError> {
        request
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))
    }
}

/// Read a response body, mapping non-success statuses and bad JSON.
async fn read_json<T: DeserializeOwned>(
    response: reqwest::Response,
    fallback: fn(u16) -> String,
) -> Result<T, ApiError> {
    let status = response.status();
    if !status.is_success() {
        // An unreadable error body still yields the status-coded message.
        let text = response.text().await.unwrap_or_default();
        let err = ApiError::remote(status.as_u16(), &text, fallback);
        tracing::warn!(status = status.as_u16(), error = %err, "remote request failed");
        return Err(err);
    }
    let text = response
        .text()
        .await
        .map_err(|e| ApiError::Transport(e.to_string()))?;
    serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
}

#[async_trait::async_trait]
impl RemoteApi for ApiClient {
    async fn list_documents(&self) -> Result<Vec<Document>, ApiError> {
        let url = self.url(DOCUMENTS_PATH);
        tracing::debug!(%url, "listing documents");
        let response = self.send(self.http.get(url)).await?;
        read_json(response, request_failed_message).await
    }

    async fn upload_document(&self, file: UploadFile) -> Result<UploadAck, ApiError> {
        let url = self.url(UPLOAD_PATH);
        tracing::debug!(%url, name = %file.name, bytes = file.bytes.len(), "uploading document");
        let part = reqwest::multipart::Part::bytes(file.bytes)
            .file_name(file.name)
            .mime_str(&file.mime)
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let form = reqwest::multipart::Form::new().part("file", part);
        let response = self.send(self.http.post(url).multipart(form)).await?;
        read_json(response, upload_failed_message).await
    }

    async fn delete_document(&self, id: &str) -> Result<DeleteAck, ApiError> {
        let url = self.document_url(id)?;
        tracing::debug!(%url, "deleting document");
        let response = self.send(self.http.delete(url)).await?;
        read_json(response, request_failed_message).await
    }

    async fn send_chat_message(&self, request: &ChatRequest) -> Result<ChatReply, ApiError> {
        let url = self.url(CHAT_PATH);
        tracing::debug!(%url, history = request.conversation_history.len(), "sending chat message");
        let response = self.send(self.http.post(url).json(request)).await?;
        read_json(response, request_failed_message).await
    }

    async fn health_check(&self) -> Result<HealthStatus, ApiError> {
        let url = self.url(HEALTH_PATH);
        tracing::debug!(%url, "checking service health");
        let response = self.send(self.http.get(url)).await?;
        read_json(response, request_failed_message).await
    }
}
