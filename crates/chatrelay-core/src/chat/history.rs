//! Read path for session transcripts.

use chatrelay_types::chat::HistoryEntry;
use chatrelay_types::error::StoreError;

use crate::store::repository::MessageStore;

/// Exposes the stored transcript of a session.
///
/// No pagination and no access check: anyone holding a session id can read it.
pub struct HistoryReader<S: MessageStore> {
    store: S,
}

impl<S: MessageStore> HistoryReader<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Turns for `session_id` in insertion order, projected to `{role, content, timestamp}`.
    pub async fn get_history(&self, session_id: &str) -> Result<Vec<HistoryEntry>, StoreError> {
        let turns = self.store.list_by_session(session_id).await?;
        Ok(turns.iter().map(|t| t.to_history_entry()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::relay::{ConversationRelay, FALLBACK_REPLY};
    use crate::chat::test_support::{MemoryStore, MockClient};
    use chatrelay_types::chat::TurnRole;

    #[tokio::test]
    async fn test_unknown_session_is_empty() {
        let reader = HistoryReader::new(MemoryStore::new());
        let history = reader.get_history("never-seen-session").await.unwrap();
        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn test_history_after_exchange() {
        let store = MemoryStore::new();
        let relay = ConversationRelay::new(store.clone(), MockClient::replying("hello!"));
        relay.handle_chat("abc", "hi").await.unwrap();

        let reader = HistoryReader::new(store);
        let history = reader.get_history("abc").await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].role, TurnRole::User);
        assert_eq!(history[0].content, "hi");
        assert_eq!(history[1].role, TurnRole::Assistant);
        assert_eq!(history[1].content, "hello!");
    }

    #[tokio::test]
    async fn test_history_shows_failed_exchange() {
        let store = MemoryStore::new();
        let relay = ConversationRelay::new(store.clone(), MockClient::failing());
        relay.handle_chat("abc", "hi").await.unwrap();

        let history = HistoryReader::new(store).get_history("abc").await.unwrap();
        assert_eq!(history[0].content, "hi");
        assert_eq!(history[1].content, FALLBACK_REPLY);
    }

    #[tokio::test]
    async fn test_repeated_reads_are_identical() {
        let store = MemoryStore::new();
        let relay = ConversationRelay::new(store.clone(), MockClient::replying("ok"));
        relay.handle_chat("abc", "one").await.unwrap();
        relay.handle_chat("abc", "two").await.unwrap();

        let reader = HistoryReader::new(store);
        let first = reader.get_history("abc").await.unwrap();
        let second = reader.get_history("abc").await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_read_failure_propagates() {
        let reader = HistoryReader::new(MemoryStore::failing_reads());
        let err = reader.get_history("abc").await.unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));
    }
}
