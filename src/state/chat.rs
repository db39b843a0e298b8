//! Conversation transcript state.
//!
//! DESIGN
//! ======
//! The transcript is append-only and never empty: it starts with a seeded
//! assistant welcome and `clear` returns it to exactly that. Message ids are
//! minted from the event's wall-clock time in milliseconds, bumped past the
//! previous id when the clock has not moved, so they are strictly increasing
//! for the whole session (including across `clear`). Only the initial
//! welcome carries [`WELCOME_ID`]; the one re-seeded by `clear` gets a
//! freshly minted id like any other message.

#[cfg(test)]
#[path = "chat_test.rs"]
mod chat_test;

use time::format_description::well_known::{Iso8601, Rfc3339};
use time::{OffsetDateTime, PrimitiveDateTime};

use crate::net::types::{HistoryEntry, Role};

pub const WELCOME_MESSAGE: &str = "Welcome! I'm your Knowledge Assistant. I can help answer questions about your documents. Try asking me something about your uploaded files.";

/// Failure recorded when a pending turn is dropped before its reply.
pub const CANCELLED_MESSAGE: &str = "request cancelled";

/// Id of the welcome message a new transcript starts with.
pub const WELCOME_ID: i64 = 1;

/// One transcript entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    pub id: i64,
    pub role: Role,
    pub content: String,
    /// Document that grounded an assistant answer.
    pub source: Option<String>,
    pub timestamp: OffsetDateTime,
}

impl Message {
    fn welcome(id: i64, at: OffsetDateTime) -> Self {
        Self { id, role: Role::Assistant, content: WELCOME_MESSAGE.to_owned(), source: None, timestamp: at }
    }

    fn history_entry(&self) -> HistoryEntry {
        HistoryEntry { role: self.role, content: self.content.clone(), source: self.source.clone() }
    }
}

/// State transitions applied by the chat store. `at` is the client time the
/// event was produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChatEvent {
    /// User text accepted (already trimmed and non-empty).
    Submitted { content: String, at: OffsetDateTime },
    /// Assistant reply arrived.
    Replied { content: String, source: Option<String>, timestamp: OffsetDateTime, at: OffsetDateTime },
    /// The round trip failed with a normalized message.
    Failed { message: String, at: OffsetDateTime },
    Cleared { at: OffsetDateTime },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatState {
    pub messages: Vec<Message>,
    pub loading: bool,
    pub error: Option<String>,
    /// Highest id minted so far; survives `clear`.
    last_id: i64,
}

impl Default for ChatState {
    fn default() -> Self {
        Self::new(OffsetDateTime::now_utc())
    }
}

impl ChatState {
    /// Transcript seeded with the welcome message.
    #[must_use]
    pub fn new(at: OffsetDateTime) -> Self {
        Self { messages: vec![Message::welcome(WELCOME_ID, at)], loading: false, error: None, last_id: WELCOME_ID }
    }

    /// Apply one event and return the next state.
    #[must_use]
    pub fn reduce(mut self, event: ChatEvent) -> Self {
        match event {
            ChatEvent::Submitted { content, at } => {
                let id = self.mint_id(at);
                self.messages
                    .push(Message { id, role: Role::User, content, source: None, timestamp: at });
                self.loading = true;
                self.error = None;
            }
            ChatEvent::Replied { content, source, timestamp, at } => {
                let id = self.mint_id(at);
                self.messages
                    .push(Message { id, role: Role::Assistant, content, source, timestamp });
                self.loading = false;
            }
            ChatEvent::Failed { message, at } => {
                let id = self.mint_id(at);
                self.messages.push(Message {
                    id,
                    role: Role::Assistant,
                    content: apology_for(&message),
                    source: None,
                    timestamp: at,
                });
                self.error = Some(message);
                self.loading = false;
            }
            ChatEvent::Cleared { at } => {
                let id = self.mint_id(at);
                self.messages = vec![Message::welcome(id, at)];
                self.error = None;
            }
        }
        self
    }

    /// Prior messages in wire form, oldest first.
    #[must_use]
    pub fn history(&self) -> Vec<HistoryEntry> {
        self.messages
            .iter()
            .map(Message::history_entry)
            .collect()
    }

    #[must_use]
    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    fn mint_id(&mut self, at: OffsetDateTime) -> i64 {
        let id = unix_millis(at).max(self.last_id.saturating_add(1));
        self.last_id = id;
        id
    }
}

/// Transcript text shown in place of an answer when the round trip fails.
#[must_use]
pub fn apology_for(message: &str) -> String {
    format!("Sorry, I encountered an error: {message}. Please try again.")
}

/// Parse a server reply timestamp: RFC 3339 first, then an offset-less ISO
/// 8601 date-time taken as UTC. Returns `None` if neither matches.
#[must_use]
pub fn parse_server_timestamp(raw: &str) -> Option<OffsetDateTime> {
    let raw = raw.trim();
    OffsetDateTime::parse(raw, &Rfc3339)
        .ok()
        .or_else(|| {
            PrimitiveDateTime::parse(raw, &Iso8601::DEFAULT)
                .ok()
                .map(PrimitiveDateTime::assume_utc)
        })
}

fn unix_millis(at: OffsetDateTime) -> i64 {
    i64::try_from(at.unix_timestamp_nanos() / 1_000_000).unwrap_or(i64::MAX)
}
