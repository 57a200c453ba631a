//! In-memory doubles for the store and completion ports.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chatrelay_types::chat::{ChatTurn, TurnRole};
use chatrelay_types::error::{CompletionError, StoreError};
use chrono::Utc;

use crate::llm::client::CompletionClient;
use crate::store::repository::MessageStore;

/// Vec-backed store. Clones share the same turns.
///
/// `fail_appends_from` makes the nth append (0-based) and every later one fail.
#[derive(Clone, Default)]
pub struct MemoryStore {
    turns: Arc<Mutex<Vec<ChatTurn>>>,
    appends: Arc<AtomicUsize>,
    fail_appends_from: Option<usize>,
    fail_reads: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_from(n: usize) -> Self {
        Self {
            fail_appends_from: Some(n),
            ..Self::default()
        }
    }

    pub fn failing_reads() -> Self {
        Self {
            fail_reads: true,
            ..Self::default()
        }
    }

    pub fn all(&self) -> Vec<ChatTurn> {
        self.turns.lock().unwrap().clone()
    }
}

impl MessageStore for MemoryStore {
    async fn append(
        &self,
        session_id: &str,
        role: TurnRole,
        content: &str,
    ) -> Result<ChatTurn, StoreError> {
        let n = self.appends.fetch_add(1, Ordering::SeqCst);
        if self.fail_appends_from.is_some_and(|from| n >= from) {
            return Err(StoreError::Unavailable("disk on fire".to_string()));
        }

        let mut turns = self.turns.lock().unwrap();
        let turn = ChatTurn {
            id: turns.len() as i64 + 1,
            session_id: session_id.to_string(),
            role,
            content: content.to_string(),
            timestamp: Utc::now(),
        };
        turns.push(turn.clone());
        Ok(turn)
    }

    async fn list_by_session(&self, session_id: &str) -> Result<Vec<ChatTurn>, StoreError> {
        if self.fail_reads {
            return Err(StoreError::Unavailable("disk on fire".to_string()));
        }
        Ok(self
            .turns
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.session_id == session_id)
            .cloned()
            .collect())
    }

    async fn count_turns(&self, session_id: &str) -> Result<u64, StoreError> {
        Ok(self.list_by_session(session_id).await?.len() as u64)
    }
}

#[derive(Clone)]
pub enum MockReply {
    Text(String),
    Fail,
}

/// Completion double that records every prompt it receives.
#[derive(Clone)]
pub struct MockClient {
    reply: MockReply,
    pub prompts: Arc<Mutex<Vec<String>>>,
}

impl MockClient {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: MockReply::Text(text.to_string()),
            prompts: Arc::default(),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: MockReply::Fail,
            prompts: Arc::default(),
        }
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

impl CompletionClient for MockClient {
    fn name(&self) -> &str {
        "mock"
    }

    fn model(&self) -> &str {
        "mock-model"
    }

    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        // Let concurrent relays interleave between their two appends.
        tokio::task::yield_now().await;
        match &self.reply {
            MockReply::Text(text) => Ok(text.clone()),
            MockReply::Fail => Err(CompletionError::Provider {
                message: "HTTP 500: upstream exploded".to_string(),
            }),
        }
    }
}
