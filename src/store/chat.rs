//! Conversation session store.
//!
//! DESIGN
//! ======
//! `send` appends the user message before the round trip and ships the
//! history as it stood just before that append, so the new text travels only
//! as `content`. While a reply is pending further sends are ignored
//! ([`SendOutcome::Busy`]) instead of racing each other.
//!
//! A submitted turn is always settled: if the `send` future is dropped
//! before the reply arrives, `PendingTurn` records a cancellation failure
//! so `loading` is released and the transcript still gains its assistant
//! entry.

#[cfg(test)]
#[path = "chat_test.rs"]
mod chat_test;

use std::sync::Arc;

use time::OffsetDateTime;
use tokio::sync::watch;

use crate::net::api::RemoteApi;
use crate::net::types::ChatRequest;
use crate::state::chat::{CANCELLED_MESSAGE, ChatEvent, ChatState, parse_server_timestamp};

/// What happened to a `send` call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SendOutcome {
    /// Input was blank after trimming; nothing changed.
    Empty,
    /// A previous send is still awaiting its reply; nothing changed.
    Busy,
    Answered,
    /// The round trip failed; an apology entry was appended.
    Failed,
}

/// Owner of the conversation transcript.
#[derive(Clone)]
pub struct ChatStore {
    api: Arc<dyn RemoteApi>,
    state: Arc<watch::Sender<ChatState>>,
}

impl ChatStore {
    pub fn new(api: Arc<dyn RemoteApi>) -> Self {
        let (state, _) = watch::channel(ChatState::new(OffsetDateTime::now_utc()));
        Self { api, state: Arc::new(state) }
    }

    #[must_use]
    pub fn snapshot(&self) -> ChatState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ChatState> {
        self.state.subscribe()
    }

    fn dispatch(&self, event: ChatEvent) {
        apply(&self.state, event);
    }

    /// Submit user text and append the assistant's answer (or an apology).
    pub async fn send(&self, text: &str) -> SendOutcome {
        let content = text.trim();
        if content.is_empty() {
            return SendOutcome::Empty;
        }

        let mut prior = None;
        self.state.send_if_modified(|state| {
            if state.loading {
                return false;
            }
            prior = Some(state.history());
            let event = ChatEvent::Submitted { content: content.to_owned(), at: OffsetDateTime::now_utc() };
            *state = std::mem::take(state).reduce(event);
            true
        });
        let Some(conversation_history) = prior else {
            tracing::debug!("send ignored while a reply is pending");
            return SendOutcome::Busy;
        };

        let turn = PendingTurn { state: &self.state, settled: false };
        let request = ChatRequest { content: content.to_owned(), conversation_history };
        match self.api.send_chat_message(&request).await {
            Ok(reply) => {
                let at = OffsetDateTime::now_utc();
                let timestamp = parse_server_timestamp(&reply.timestamp).unwrap_or_else(|| {
                    tracing::warn!(raw = %reply.timestamp, "unparseable reply timestamp, using client time");
                    at
                });
                tracing::debug!(source = ?reply.source, "assistant replied");
                turn.settle(ChatEvent::Replied { content: reply.content, source: reply.source, timestamp, at });
                SendOutcome::Answered
            }
            Err(e) => {
                tracing::warn!(error = %e, "chat request failed");
                turn.settle(ChatEvent::Failed { message: e.to_string(), at: OffsetDateTime::now_utc() });
                SendOutcome::Failed
            }
        }
    }

    /// Reset the transcript to the welcome message and clear `error`.
    pub fn clear(&self) {
        self.dispatch(ChatEvent::Cleared { at: OffsetDateTime::now_utc() });
    }
}

fn apply(state: &watch::Sender<ChatState>, event: ChatEvent) {
    state.send_modify(|state| *state = std::mem::take(state).reduce(event));
}

/// A submitted turn awaiting its reply.
struct PendingTurn<'a> {
    state: &'a watch::Sender<ChatState>,
    settled: bool,
}

impl PendingTurn<'_> {
    fn settle(mut self, event: ChatEvent) {
        self.settled = true;
        apply(self.state, event);
    }
}

impl Drop for PendingTurn<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        tracing::warn!("chat request dropped before its reply");
        apply(
            self.state,
            ChatEvent::Failed { message: CANCELLED_MESSAGE.to_owned(), at: OffsetDateTime::now_utc() },
        );
    }
}
