//! Conversation log entries.
//!
//! The log is append-only and owned exclusively by the session; entries
//! are immutable after creation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who authored a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sender {
    /// The observer's voice.
    System,
    /// The hero's diary.
    Hero,
}

/// A single entry in the session log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Unique entry id.
    pub id: Uuid,
    /// Who authored the entry.
    pub sender: Sender,
    /// The entry text.
    pub content: String,
    /// Creation time. Monotonic within a session log.
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Creates a new entry stamped with the current time.
    pub fn new(sender: Sender, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}
