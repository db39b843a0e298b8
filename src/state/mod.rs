//! Session state for the document list and the conversation transcript.
//!
//! DESIGN
//! ======
//! Each slice is a plain owned struct with a pure `reduce(self, event)`
//! update function. Stores feed events in; renderers read snapshots out.
//! Nothing here performs I/O or reads the clock, so every transition is
//! unit-testable as-is.

pub mod chat;
pub mod documents;
