//! Conversation session state

use crate::api::{HistoryEntry, WireRole};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Bot message appended whenever a chat round trip fails
pub const FALLBACK_REPLY: &str =
    "Sorry, I'm having trouble connecting right now. Please try again later.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    pub fn wire_role(self) -> WireRole {
        match self {
            Sender::User => WireRole::User,
            Sender::Bot => WireRole::Model,
        }
    }
}

/// One entry of the history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Position in the history at append time; a rendering key only
    pub id: usize,
    pub content: String,
    pub sender: Sender,
    pub sent_at: DateTime<Utc>,
}

/// Append-only history, unsent draft and the single-flight flag
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionState {
    pub messages: Vec<ChatMessage>,
    pub draft: String,
    /// True while a chat request is in flight
    pub pending: bool,
}

impl SessionState {
    /// Session opening with a single bot greeting
    pub fn with_greeting(greeting: impl Into<String>, at: DateTime<Utc>) -> Self {
        let mut state = Self::default();
        state.append(greeting, Sender::Bot, at);
        state
    }

    pub(crate) fn append(&mut self, content: impl Into<String>, sender: Sender, at: DateTime<Utc>) {
        self.messages.push(ChatMessage {
            id: self.messages.len(),
            content: content.into(),
            sender,
            sent_at: at,
        });
    }

    /// Every message so far, as replayed to the stateless backend
    pub fn history(&self) -> Vec<HistoryEntry> {
        self.messages
            .iter()
            .map(|m| HistoryEntry {
                role: m.sender.wire_role(),
                content: m.content.clone(),
            })
            .collect()
    }

    /// Whether `send` would currently be accepted
    pub fn can_send(&self) -> bool {
        !self.pending && !self.draft.trim().is_empty()
    }

    pub fn last_message(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }
}
