//! Networking modules for the remote document/chat service.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` issues the REST calls, `error` normalizes failures, `types` defines
//! the wire schema, and `upload` prepares multipart file payloads.

pub mod api;
pub mod error;
pub mod types;
pub mod upload;
