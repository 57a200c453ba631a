//! Configuration loader for Chatrelay.
//!
//! Reads `config.toml` from the data directory (`~/.chatrelay/` in production)
//! into [`RelayConfig`], then applies `CHATRELAY_*` environment overrides.
//! Falls back to defaults when the file is missing or malformed.

use std::path::{Path, PathBuf};

use chatrelay_types::config::RelayConfig;

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `CHATRELAY_DATA_DIR` environment variable
/// 2. `~/.chatrelay`
/// 3. `.chatrelay` in the working directory
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("CHATRELAY_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".chatrelay");
    }

    PathBuf::from(".chatrelay")
}

/// Load `{data_dir}/config.toml` without environment overrides.
///
/// - Missing file: [`RelayConfig::default()`].
/// - Unparseable file: logs a warning and returns the default.
pub async fn load_config_file(data_dir: &Path) -> RelayConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return RelayConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return RelayConfig::default();
        }
    };

    match toml::from_str::<RelayConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            RelayConfig::default()
        }
    }
}

/// Overlay `CHATRELAY_*` variables onto `config`.
///
/// `lookup` abstracts the environment so tests need not mutate process state.
/// Values that fail to parse are ignored with a warning.
pub fn apply_env_overrides<F>(mut config: RelayConfig, lookup: F) -> RelayConfig
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(model) = lookup("CHATRELAY_MODEL") {
        config.model = model;
    }
    if let Some(base_url) = lookup("CHATRELAY_BASE_URL") {
        config.base_url = base_url;
    }
    if let Some(url) = lookup("CHATRELAY_DATABASE_URL") {
        config.database_url = Some(url);
    }
    if let Some(raw) = lookup("CHATRELAY_FAILURE_POLICY") {
        match raw.parse() {
            Ok(policy) => config.failure_policy = policy,
            Err(err) => tracing::warn!("Ignoring CHATRELAY_FAILURE_POLICY: {err}"),
        }
    }
    if let Some(raw) = lookup("CHATRELAY_REQUEST_TIMEOUT_SECS") {
        match raw.parse() {
            Ok(secs) => config.request_timeout_secs = secs,
            Err(err) => tracing::warn!("Ignoring CHATRELAY_REQUEST_TIMEOUT_SECS='{raw}': {err}"),
        }
    }
    config
}
