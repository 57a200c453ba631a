//! SQLite message store implementation.
//!
//! Implements `MessageStore` from `chatrelay-core` using sqlx with split
//! read/write pools: raw queries, a private Row struct, inserts on the writer
//! and selects on the reader.

use chatrelay_core::store::repository::MessageStore;
use chatrelay_types::chat::{ChatTurn, TurnRole};
use chatrelay_types::error::StoreError;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::Row;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `MessageStore`.
#[derive(Clone)]
pub struct SqliteMessageStore {
    pool: DatabasePool,
}

impl SqliteMessageStore {
    /// Create a new store backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Private Row type for SQLite-to-domain mapping
// ---------------------------------------------------------------------------

struct ChatTurnRow {
    id: i64,
    session_id: String,
    role: String,
    content: String,
    timestamp: String,
}

impl ChatTurnRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            session_id: row.try_get("session_id")?,
            role: row.try_get("role")?,
            content: row.try_get("content")?,
            timestamp: row.try_get("timestamp")?,
        })
    }

    fn into_turn(self) -> Result<ChatTurn, StoreError> {
        let role: TurnRole = self.role.parse().map_err(StoreError::Corrupt)?;
        let timestamp = parse_datetime(&self.timestamp)?;

        Ok(ChatTurn {
            id: self.id,
            session_id: self.session_id,
            role,
            content: self.content,
            timestamp,
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::Corrupt(format!("invalid timestamp '{s}': {e}")))
}

/// Fixed microsecond precision so stored text sorts and round-trips exactly.
fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn unavailable(e: sqlx::Error) -> StoreError {
    StoreError::Unavailable(e.to_string())
}

// ---------------------------------------------------------------------------
// MessageStore implementation
// ---------------------------------------------------------------------------

impl MessageStore for SqliteMessageStore {
    async fn append(
        &self,
        session_id: &str,
        role: TurnRole,
        content: &str,
    ) -> Result<ChatTurn, StoreError> {
        // Hold the single writer connection before stamping, so timestamps
        // follow id order even under concurrent appends.
        let mut conn = self.pool.writer.acquire().await.map_err(unavailable)?;
        let timestamp = format_datetime(&Utc::now());

        let result = sqlx::query(
            r#"INSERT INTO chat_turns (session_id, role, content, timestamp)
               VALUES (?, ?, ?, ?)"#,
        )
        .bind(session_id)
        .bind(role.to_string())
        .bind(content)
        .bind(&timestamp)
        .execute(&mut *conn)
        .await
        .map_err(unavailable)?;

        Ok(ChatTurn {
            id: result.last_insert_rowid(),
            session_id: session_id.to_string(),
            role,
            content: content.to_string(),
            timestamp: parse_datetime(&timestamp)?,
        })
    }

    async fn list_by_session(&self, session_id: &str) -> Result<Vec<ChatTurn>, StoreError> {
        let rows = sqlx::query(
            "SELECT id, session_id, role, content, timestamp FROM chat_turns WHERE session_id = ? ORDER BY id ASC",
        )
        .bind(session_id)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(unavailable)?;

        let mut turns = Vec::with_capacity(rows.len());
        for row in &rows {
            let turn_row = ChatTurnRow::from_row(row)
                .map_err(|e| StoreError::Corrupt(e.to_string()))?;
            turns.push(turn_row.into_turn()?);
        }

        Ok(turns)
    }

    async fn count_turns(&self, session_id: &str) -> Result<u64, StoreError> {
        let row = sqlx::query("SELECT COUNT(*) as cnt FROM chat_turns WHERE session_id = ?")
            .bind(session_id)
            .fetch_one(&self.pool.reader)
            .await
            .map_err(unavailable)?;

        let count: i64 = row
            .try_get("cnt")
            .map_err(|e| StoreError::Corrupt(e.to_string()))?;

        Ok(count as u64)
    }
}
