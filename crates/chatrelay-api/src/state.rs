//! Application state wiring the relay together.
//!
//! The relay and history reader are generic over store/client traits; AppState
//! pins them to the SQLite store and the boxed Gemini client.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use secrecy::ExposeSecret;

use chatrelay_core::chat::history::HistoryReader;
use chatrelay_core::chat::relay::ConversationRelay;
use chatrelay_core::llm::box_client::BoxCompletionClient;
use chatrelay_core::llm::client::CompletionClient;
use chatrelay_infra::config::{apply_env_overrides, load_config_file, resolve_data_dir};
use chatrelay_infra::llm::create_client;
use chatrelay_infra::secret::{API_KEY_VAR, mask_secret, resolve_api_key_with};
use chatrelay_infra::sqlite::pool::{DatabasePool, default_database_url};
use chatrelay_infra::sqlite::turn::SqliteMessageStore;
use chatrelay_types::config::RelayConfig;

pub type ConcreteRelay = ConversationRelay<SqliteMessageStore, BoxCompletionClient>;
pub type ConcreteHistoryReader = HistoryReader<SqliteMessageStore>;

/// Shared application state, used by both CLI commands and HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<ConcreteRelay>,
    pub history: Arc<ConcreteHistoryReader>,
    pub config: Arc<RelayConfig>,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Load config, resolve the API key, open the database and wire the relay.
    pub async fn init() -> anyhow::Result<Self> {
        Self::init_from(&resolve_data_dir(), |key| std::env::var(key).ok()).await
    }

    /// Like [`AppState::init`], reading variables through `env`.
    ///
    /// The credential is checked first: a missing `GEMINI_API_KEY` fails
    /// before the data directory or database is touched.
    pub async fn init_from<F>(data_dir: &Path, env: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = resolve_api_key_with(API_KEY_VAR, &env)
            .context("Completion service credential not configured")?;
        tracing::info!(api_key = %mask_secret(api_key.expose_secret()), "Loaded API key");

        let (config, db_pool) = open_store_in(data_dir, &env).await?;

        let client = create_client(&config, api_key)?;
        tracing::info!(
            provider = client.name(),
            model = client.model(),
            "Completion client ready"
        );

        Ok(Self::from_parts(config, db_pool, client))
    }

    /// Wire state from already-built parts.
    pub fn from_parts(
        config: RelayConfig,
        db_pool: DatabasePool,
        client: BoxCompletionClient,
    ) -> Self {
        let relay = ConversationRelay::new(SqliteMessageStore::new(db_pool.clone()), client)
            .with_failure_policy(config.failure_policy);
        let history = HistoryReader::new(SqliteMessageStore::new(db_pool.clone()));

        Self {
            relay: Arc::new(relay),
            history: Arc::new(history),
            config: Arc::new(config),
            db_pool,
        }
    }
}

/// Load config and open the database without touching the credential.
///
/// Read-only commands such as `history` go through here.
pub async fn open_store() -> anyhow::Result<(RelayConfig, DatabasePool)> {
    open_store_in(&resolve_data_dir(), |key| std::env::var(key).ok()).await
}

async fn open_store_in<F>(data_dir: &Path, env: F) -> anyhow::Result<(RelayConfig, DatabasePool)>
where
    F: Fn(&str) -> Option<String>,
{
    tokio::fs::create_dir_all(data_dir)
        .await
        .with_context(|| format!("Failed to create data directory {}", data_dir.display()))?;

    let config = apply_env_overrides(load_config_file(data_dir).await, env);
    let db_pool = open_database(data_dir, &config).await?;
    Ok((config, db_pool))
}

async fn open_database(data_dir: &Path, config: &RelayConfig) -> anyhow::Result<DatabasePool> {
    let db_url = config
        .database_url
        .clone()
        .unwrap_or_else(|| default_database_url(data_dir));
    tracing::debug!(url = %db_url, "Opening message store");

    DatabasePool::new(&db_url)
        .await
        .with_context(|| format!("Failed to open database at {db_url}"))
}
