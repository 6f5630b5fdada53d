//! Conversation messages and the append-only log

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who wrote a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    User,
    Bot,
}

/// A single entry in the conversation log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Position in the log, starting at 1
    pub sequence_id: u64,
    pub sender: Sender,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// Ordered message history; entries are never changed or removed
#[derive(Debug, Default)]
pub struct MessageLog {
    messages: Vec<Message>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, sender: Sender, text: impl Into<String>) -> &Message {
        let sequence_id = self.messages.len() as u64 + 1;
        self.messages.push(Message {
            sequence_id,
            sender,
            text: text.into(),
            created_at: Utc::now(),
        });
        &self.messages[self.messages.len() - 1]
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
