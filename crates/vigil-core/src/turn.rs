//! Per-turn result value.

use serde::{Deserialize, Serialize};

/// What one continuation call produced.
///
/// Ephemeral: the diary entry is appended to the log as a hero message,
/// the status text replaces the previous one, and the death flag drives
/// the lifecycle transition. Nothing else is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnResult {
    /// The hero's diary entry for this turn.
    pub diary_entry: String,
    /// True when the hero did not survive the turn.
    pub is_dead: bool,
    /// Short status line describing the hero's condition.
    pub status_description: String,
}
