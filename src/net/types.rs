//! Wire DTOs for the remote document/chat service.
//!
//! DESIGN
//! ======
//! These mirror the service's JSON bodies field for field so serde stays the
//! only place that knows the wire names (`type`, `conversation_history`).

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// A document held by the remote store, as returned by `GET /api/documents`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Remote-assigned identifier. Accepted as a JSON string or integer.
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    /// Display name (usually the original file name).
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    /// Last-modified time, formatted by the server.
    pub modified: String,
    /// Type tag derived from extension/MIME (e.g. `"pdf"`).
    #[serde(rename = "type")]
    pub kind: String,
}

/// Author of a transcript entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One prior message sent as context with a new chat request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(rename = "type")]
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Body of `POST /api/chat`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The new user text; never duplicated inside `conversation_history`.
    pub content: String,
    #[serde(default)]
    pub conversation_history: Vec<HistoryEntry>,
}

/// Assistant reply from `POST /api/chat`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub content: String,
    /// Document that grounded the answer, if any.
    #[serde(default)]
    pub source: Option<String>,
    pub timestamp: String,
}

/// Acknowledgment from `POST /api/upload`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadAck {
    pub message: String,
    pub filename: String,
}

/// Acknowledgment from `DELETE /api/documents/{id}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteAck {
    pub message: String,
}

/// Service status from `GET /api/health`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub documents_count: u64,
    pub timestamp: String,
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(D::Error::custom(format!("expected string or number id, got {other}"))),
    }
}
