//! Completion client implementations.
//!
//! Provides the concrete [`GeminiClient`](gemini::GeminiClient) and a factory
//! ([`create_client`]) that builds it from a [`RelayConfig`].

pub mod gemini;

use std::time::Duration;

use secrecy::SecretString;

use chatrelay_core::llm::box_client::BoxCompletionClient;
use chatrelay_types::config::RelayConfig;
use chatrelay_types::error::CompletionError;

use self::gemini::GeminiClient;

/// Create a [`BoxCompletionClient`] from the relay configuration.
///
/// # Errors
///
/// Returns [`CompletionError::InvalidRequest`] if the configured model is
/// empty or the HTTP client cannot be built.
pub fn create_client(
    config: &RelayConfig,
    api_key: SecretString,
) -> Result<BoxCompletionClient, CompletionError> {
    let client = GeminiClient::new(
        api_key,
        config.model.clone(),
        &config.base_url,
        Duration::from_secs(config.request_timeout_secs),
    )?;

    tracing::debug!(
        model = %config.model,
        base_url = %config.base_url,
        "Created Gemini completion client"
    );

    Ok(BoxCompletionClient::new(client))
}
