//! Client-side state and synchronization for a document-grounded assistant.
//!
//! SYSTEM CONTEXT
//! ==============
//! `net` talks to the remote document/chat service, `state` holds the pure
//! document and conversation state with their update functions, and `store`
//! wraps each state in an owning session store that runs the request
//! lifecycles and publishes snapshots to whatever renders them.

pub mod config;
pub mod net;
pub mod state;
pub mod store;

pub use config::ClientConfig;
pub use net::api::{ApiClient, RemoteApi};
pub use net::error::ApiError;
pub use store::chat::{ChatStore, SendOutcome};
pub use store::documents::DocumentStore;
pub use store::StoreError;
