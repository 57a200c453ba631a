//! Chat turn and transcript types for Chatrelay.
//!
//! A conversation is nothing more than the ordered set of turns sharing a
//! `session_id`. There is no session entity: the id is an opaque grouping key
//! supplied by the caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Who produced a turn.
///
/// Maps to the CHECK constraint in the SQLite schema:
/// `CHECK (role IN ('user', 'assistant'))`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
}

impl fmt::Display for TurnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnRole::User => write!(f, "user"),
            TurnRole::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for TurnRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(TurnRole::User),
            "assistant" => Ok(TurnRole::Assistant),
            other => Err(format!("invalid turn role: '{other}'")),
        }
    }
}

/// A single stored message within a session.
///
/// `id` and `timestamp` are assigned by the store on insert. Turns are never
/// updated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub id: i64,
    pub session_id: String,
    pub role: TurnRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatTurn {
    /// Project this turn onto the public history shape.
    pub fn to_history_entry(&self) -> HistoryEntry {
        HistoryEntry {
            role: self.role,
            content: self.content.clone(),
            timestamp: self.timestamp,
        }
    }
}

/// One element of the transcript returned by `GET /history/{session_id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: TurnRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// The two turns persisted by one relay step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatExchange {
    pub user_turn: ChatTurn,
    pub assistant_turn: ChatTurn,
    /// True when the completion call failed and the assistant turn holds the
    /// failure reply instead of model output.
    pub completion_failed: bool,
}

impl ChatExchange {
    /// The text returned to the caller.
    pub fn reply(&self) -> &str {
        &self.assistant_turn.content
    }
}
