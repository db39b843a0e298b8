//! Session stores: the owners and sole mutators of each state slice.
//!
//! SYSTEM CONTEXT
//! ==============
//! A store wraps one `state` slice in a `tokio::sync::watch` channel. Action
//! methods (`fetch`, `upload`, `remove`, `send`, `clear`) call the remote API
//! and apply reducer events; renderers read `snapshot()` or hold a
//! `subscribe()` receiver to be woken on every change. Stores are cheap to
//! clone and all clones share the same state.
//!
//! ERROR HANDLING
//! ==============
//! Failures are always recorded in the slice's `error` field. Document
//! actions also return them to the caller; chat failures are surfaced as a
//! transcript entry instead.

pub mod chat;
pub mod documents;

#[cfg(test)]
pub(crate) mod test_helpers;

use crate::net::error::ApiError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Another upload lifecycle is still active on this store.
    #[error("an upload is already in progress")]
    UploadInProgress,
}
