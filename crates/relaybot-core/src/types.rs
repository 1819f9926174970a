use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sender of a chat message, as reported by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// Platform-native account identifier (Discord snowflake).
    pub id: u64,
    /// Account username; may contain spaces and punctuation.
    pub name: String,
    /// True for automated accounts, including this bot itself.
    pub bot: bool,
}

/// A channel message, read-only from the relay's point of view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: u64,
    pub channel_id: u64,
    pub author: Author,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    /// Whether the content begins with the reserved command prefix.
    pub fn is_command(&self, prefix: char) -> bool {
        self.content.starts_with(prefix)
    }

    /// Whether this message was written by `account_id`.
    pub fn is_from(&self, account_id: u64) -> bool {
        self.author.id == account_id
    }
}
