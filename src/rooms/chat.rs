//! Room chat
//!
//! A per-room message list kept in memory with the rest of the live room
//! state. Messages are plain text or dice-roll results; the list is
//! capped and evicts oldest-first.

use serde::{Deserialize, Serialize};

/// Maximum messages retained per room
pub const MAX_MESSAGES: usize = 200;

/// What kind of chat entry this is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    /// Plain table talk
    Say,
    /// A dice roll with per-die detail in the body
    Roll,
}

/// One chat entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub author: String,
    pub kind: MessageKind,
    pub body: String,
    pub created_at: String,
}

impl ChatMessage {
    /// Create a new chat entry
    pub fn new(author: &str, kind: MessageKind, body: &str) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            author: author.to_string(),
            kind,
            body: body.to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Capped, oldest-first-evicting message list
#[derive(Debug, Clone, Default)]
pub struct ChatLog {
    messages: Vec<ChatMessage>,
}

impl ChatLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message, evicting the oldest past the cap
    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
        if self.messages.len() > MAX_MESSAGES {
            let excess = self.messages.len() - MAX_MESSAGES;
            self.messages.drain(..excess);
        }
    }

    /// All retained messages, oldest first
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Number of retained messages
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the log is empty
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
