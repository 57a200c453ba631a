//! Conversation relay: one inbound message, one stored exchange.
//!
//! `ConversationRelay` persists the user turn, calls the completion service
//! with that message alone, persists whatever reply results (model output or
//! the failure reply), and hands the exchange back to the caller.
//!
//! The two appends are independent writes. The user turn is committed before
//! the completion call starts, so failed exchanges stay visible in history.

use tracing::{Instrument, debug, error, info, info_span, warn};

use chatrelay_types::chat::{ChatExchange, TurnRole};
use chatrelay_types::config::FailurePolicy;
use chatrelay_types::error::{CompletionError, StoreError};

use crate::llm::client::CompletionClient;
use crate::store::repository::MessageStore;

/// Reply stored and returned when the completion service fails under
/// [`FailurePolicy::Placeholder`].
pub const FALLBACK_REPLY: &str =
    "Sorry, something went wrong while contacting the AI. Please try again later.";

/// Orchestrates a single chat turn against a store and a completion client.
///
/// Generic over both ports so chatrelay-core never depends on chatrelay-infra.
pub struct ConversationRelay<S: MessageStore, C: CompletionClient> {
    store: S,
    client: C,
    failure_policy: FailurePolicy,
}

impl<S: MessageStore, C: CompletionClient> ConversationRelay<S, C> {
    /// Create a relay with the default (placeholder) failure policy.
    pub fn new(store: S, client: C) -> Self {
        Self {
            store,
            client,
            failure_policy: FailurePolicy::default(),
        }
    }

    pub fn with_failure_policy(mut self, failure_policy: FailurePolicy) -> Self {
        self.failure_policy = failure_policy;
        self
    }

    /// Access the message store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Access the completion client.
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Run one relay step for `session_id`.
    ///
    /// Store failures are returned to the caller. Completion failures are not:
    /// they become the assistant turn's content and `completion_failed` is set.
    /// If the assistant append fails, the already-committed user turn stays.
    pub async fn handle_chat(
        &self,
        session_id: &str,
        message: &str,
    ) -> Result<ChatExchange, StoreError> {
        let user_turn = self
            .store
            .append(session_id, TurnRole::User, message)
            .await?;
        debug!(session_id = %session_id, turn_id = user_turn.id, "User turn stored");

        let span = info_span!(
            "gen_ai.complete",
            gen_ai.system = self.client.name(),
            gen_ai.request.model = %self.client.model(),
            session_id = %session_id,
        );

        let (reply, completion_failed) =
            match self.client.complete(message).instrument(span).await {
                Ok(text) => (text, false),
                Err(err) => {
                    warn!(
                        session_id = %session_id,
                        provider = self.client.name(),
                        error = %err,
                        "Completion failed, storing failure reply"
                    );
                    (self.failure_reply(&err), true)
                }
            };

        let assistant_turn = self
            .store
            .append(session_id, TurnRole::Assistant, &reply)
            .await
            .inspect_err(|e| {
                error!(
                    session_id = %session_id,
                    user_turn_id = user_turn.id,
                    error = %e,
                    "Assistant turn not stored; user turn remains committed"
                );
            })?;

        info!(
            session_id = %session_id,
            user_turn_id = user_turn.id,
            assistant_turn_id = assistant_turn.id,
            completion_failed,
            "Exchange stored"
        );

        Ok(ChatExchange {
            user_turn,
            assistant_turn,
            completion_failed,
        })
    }

    /// The assistant content to store for a failed completion.
    pub fn failure_reply(&self, err: &CompletionError) -> String {
        match self.failure_policy {
            FailurePolicy::Placeholder => FALLBACK_REPLY.to_string(),
            FailurePolicy::Verbose => format!("Error: {err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::test_support::{MemoryStore, MockClient};

    #[tokio::test]
    async fn test_successful_exchange_returns_reply() {
        let store = MemoryStore::new();
        let relay = ConversationRelay::new(store.clone(), MockClient::replying("hello!"));

        let exchange = relay.handle_chat("abc", "hi").await.unwrap();
        assert_eq!(exchange.reply(), "hello!");
        assert!(!exchange.completion_failed);
        assert_eq!(exchange.user_turn.role, TurnRole::User);
        assert_eq!(exchange.user_turn.content, "hi");
        assert_eq!(exchange.assistant_turn.role, TurnRole::Assistant);

        let turns = store.list_by_session("abc").await.unwrap();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0], exchange.user_turn);
        assert_eq!(turns[1], exchange.assistant_turn);
    }

    #[tokio::test]
    async fn test_user_turn_precedes_assistant_turn() {
        let relay = ConversationRelay::new(MemoryStore::new(), MockClient::replying("ok"));

        let exchange = relay.handle_chat("abc", "hi").await.unwrap();
        assert!(exchange.user_turn.id < exchange.assistant_turn.id);
        assert!(exchange.user_turn.timestamp <= exchange.assistant_turn.timestamp);
    }

    #[tokio::test]
    async fn test_completion_failure_is_masked() {
        let store = MemoryStore::new();
        let relay = ConversationRelay::new(store.clone(), MockClient::failing());

        let exchange = relay.handle_chat("abc", "hi").await.unwrap();
        assert!(exchange.completion_failed);
        assert_eq!(exchange.reply(), FALLBACK_REPLY);
        assert!(!exchange.reply().contains("upstream exploded"));

        let turns = store.list_by_session("abc").await.unwrap();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].content, "hi");
        assert_eq!(turns[1].content, FALLBACK_REPLY);
    }

    #[tokio::test]
    async fn test_verbose_policy_exposes_error() {
        let relay = ConversationRelay::new(MemoryStore::new(), MockClient::failing())
            .with_failure_policy(FailurePolicy::Verbose);

        let exchange = relay.handle_chat("abc", "hi").await.unwrap();
        assert_eq!(
            exchange.reply(),
            "Error: provider error: HTTP 500: upstream exploded"
        );
    }

    #[tokio::test]
    async fn test_empty_completion_is_success() {
        let relay = ConversationRelay::new(MemoryStore::new(), MockClient::replying(""));

        let exchange = relay.handle_chat("abc", "hi").await.unwrap();
        assert!(!exchange.completion_failed);
        assert_eq!(exchange.reply(), "");
    }

    #[tokio::test]
    async fn test_first_append_failure_skips_completion() {
        let client = MockClient::replying("never");
        let relay = ConversationRelay::new(MemoryStore::failing_from(0), client.clone());

        let err = relay.handle_chat("abc", "hi").await.unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn test_second_append_failure_keeps_user_turn() {
        let store = MemoryStore::failing_from(1);
        let relay = ConversationRelay::new(store.clone(), MockClient::replying("lost"));

        let err = relay.handle_chat("abc", "hi").await.unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));

        let turns = store.all();
        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0].role, TurnRole::User);
        assert_eq!(turns[0].content, "hi");
    }

    #[tokio::test]
    async fn test_only_current_message_is_sent() {
        let client = MockClient::replying("ok");
        let relay = ConversationRelay::new(MemoryStore::new(), client.clone());

        relay.handle_chat("abc", "first").await.unwrap();
        relay.handle_chat("abc", "second").await.unwrap();

        let prompts = client.prompts.lock().unwrap().clone();
        assert_eq!(prompts, vec!["first".to_string(), "second".to_string()]);
    }

    #[tokio::test]
    async fn test_n_chats_store_2n_alternating_turns() {
        let store = MemoryStore::new();
        let relay = ConversationRelay::new(store.clone(), MockClient::replying("ok"));

        for i in 0..5 {
            relay.handle_chat("s1", &format!("msg {i}")).await.unwrap();
        }
        relay.handle_chat("s2", "elsewhere").await.unwrap();

        let turns = store.list_by_session("s1").await.unwrap();
        assert_eq!(turns.len(), 10);
        assert_eq!(store.count_turns("s1").await.unwrap(), 10);
        for (i, pair) in turns.chunks(2).enumerate() {
            assert_eq!(pair[0].role, TurnRole::User);
            assert_eq!(pair[0].content, format!("msg {i}"));
            assert_eq!(pair[1].role, TurnRole::Assistant);
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_chats_keep_each_pair_ordered() {
        let store = MemoryStore::new();
        let relay = std::sync::Arc::new(ConversationRelay::new(
            store.clone(),
            MockClient::replying("ok"),
        ));

        let n = 20;
        let mut handles = Vec::new();
        for i in 0..n {
            let relay = relay.clone();
            handles.push(tokio::spawn(async move {
                relay.handle_chat("abc", &format!("message {i}")).await
            }));
        }

        for (i, handle) in handles.into_iter().enumerate() {
            let exchange = handle.await.unwrap().unwrap();
            assert_eq!(exchange.user_turn.content, format!("message {i}"));
            assert!(exchange.user_turn.id < exchange.assistant_turn.id);
            assert!(exchange.user_turn.timestamp <= exchange.assistant_turn.timestamp);
        }

        let turns = store.list_by_session("abc").await.unwrap();
        assert_eq!(turns.len(), 2 * n);
        let users = turns.iter().filter(|t| t.role == TurnRole::User).count();
        assert_eq!(users, n);
    }
}
