//! MessageStore trait definition.
//!
//! Append-only persistence for chat turns, queried by session.
//! Uses native async fn in traits (RPITIT, Rust 2024 edition).

use chatrelay_types::chat::{ChatTurn, TurnRole};
use chatrelay_types::error::StoreError;

/// Repository trait for chat turn persistence.
///
/// Implementations live in chatrelay-infra (e.g., `SqliteMessageStore`).
/// There is no update or delete: turns are immutable once appended.
pub trait MessageStore: Send + Sync {
    /// Insert a new turn. The store assigns `id` and `timestamp`.
    ///
    /// The write is committed before the future resolves.
    fn append(
        &self,
        session_id: &str,
        role: TurnRole,
        content: &str,
    ) -> impl std::future::Future<Output = Result<ChatTurn, StoreError>> + Send;

    /// All turns for a session, ordered by `id` ascending.
    ///
    /// Unknown sessions yield an empty vector.
    fn list_by_session(
        &self,
        session_id: &str,
    ) -> impl std::future::Future<Output = Result<Vec<ChatTurn>, StoreError>> + Send;

    /// Number of turns stored for a session.
    fn count_turns(
        &self,
        session_id: &str,
    ) -> impl std::future::Future<Output = Result<u64, StoreError>> + Send;
}
