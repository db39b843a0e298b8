//! Scripted in-memory `RemoteApi` for store tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::net::api::RemoteApi;
use crate::net::error::ApiError;
use crate::net::types::{ChatReply, ChatRequest, DeleteAck, Document, HealthStatus, UploadAck};
use crate::net::upload::UploadFile;

pub(crate) fn doc(id: &str, name: &str) -> Document {
    Document {
        id: id.into(),
        name: name.into(),
        size: 2048,
        modified: "2024-01-01 10:00".into(),
        kind: name.rsplit('.').next().unwrap_or_default().into(),
    }
}

pub(crate) fn remote_error(status: u16, message: &str) -> ApiError {
    ApiError::Remote { status, message: message.into() }
}

pub(crate) fn reply(content: &str, source: Option<&str>) -> ChatReply {
    ChatReply { content: content.into(), source: source.map(Into::into), timestamp: "2024-05-01T12:00:00".into() }
}

/// Each call pops the next scripted result; an empty queue yields a benign
/// default so tests only script what they assert on.
#[derive(Default)]
pub(crate) struct MockApi {
    lists: Mutex<VecDeque<(Result<Vec<Document>, ApiError>, Duration)>>,
    uploads: Mutex<VecDeque<Result<UploadAck, ApiError>>>,
    deletes: Mutex<VecDeque<Result<DeleteAck, ApiError>>>,
    chats: Mutex<VecDeque<Result<ChatReply, ApiError>>>,
    pub(crate) upload_delay: Duration,
    pub(crate) chat_delay: Duration,
    pub(crate) list_calls: AtomicUsize,
    pub(crate) uploaded: Mutex<Vec<String>>,
    pub(crate) deleted: Mutex<Vec<String>>,
    pub(crate) chat_requests: Mutex<Vec<ChatRequest>>,
}

impl MockApi {
    pub(crate) fn with_list(self, result: Result<Vec<Document>, ApiError>) -> Self {
        self.with_slow_list(result, Duration::ZERO)
    }

    /// Script a list result that resolves only after `delay`.
    pub(crate) fn with_slow_list(self, result: Result<Vec<Document>, ApiError>, delay: Duration) -> Self {
        self.lists.lock().unwrap().push_back((result, delay));
        self
    }

    pub(crate) fn with_upload(self, result: Result<UploadAck, ApiError>) -> Self {
        self.uploads.lock().unwrap().push_back(result);
        self
    }

    pub(crate) fn with_delete(self, result: Result<DeleteAck, ApiError>) -> Self {
        self.deletes.lock().unwrap().push_back(result);
        self
    }

    pub(crate) fn with_chat(self, result: Result<ChatReply, ApiError>) -> Self {
        self.chats.lock().unwrap().push_back(result);
        self
    }

    pub(crate) fn with_upload_delay(mut self, delay: Duration) -> Self {
        self.upload_delay = delay;
        self
    }

    pub(crate) fn with_chat_delay(mut self, delay: Duration) -> Self {
        self.chat_delay = delay;
        self
    }

    pub(crate) fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl RemoteApi for MockApi {
    async fn list_documents(&self) -> Result<Vec<Document>, ApiError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let next = self.lists.lock().unwrap().pop_front();
        let (result, delay) = next.unwrap_or_else(|| (Ok(Vec::new()), Duration::ZERO));
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        result
    }

    async fn upload_document(&self, file: UploadFile) -> Result<UploadAck, ApiError> {
        self.uploaded.lock().unwrap().push(file.name.clone());
        if !self.upload_delay.is_zero() {
            tokio::time::sleep(self.upload_delay).await;
        }
        let next = self.uploads.lock().unwrap().pop_front();
        next.unwrap_or_else(|| {
            Ok(UploadAck { message: format!("File {} uploaded successfully", file.name), filename: file.name })
        })
    }

    async fn delete_document(&self, id: &str) -> Result<DeleteAck, ApiError> {
        self.deleted.lock().unwrap().push(id.to_owned());
        let next = self.deletes.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Ok(DeleteAck { message: format!("Document {id} deleted successfully") }))
    }

    async fn send_chat_message(&self, request: &ChatRequest) -> Result<ChatReply, ApiError> {
        self.chat_requests.lock().unwrap().push(request.clone());
        if !self.chat_delay.is_zero() {
            tokio::time::sleep(self.chat_delay).await;
        }
        let next = self.chats.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Ok(reply("ok", None)))
    }

    async fn health_check(&self) -> Result<HealthStatus, ApiError> {
        Ok(HealthStatus { status: "healthy".into(), documents_count: 0, timestamp: "now".into() })
    }
}
