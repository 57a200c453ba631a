//! GeminiClient: [`CompletionClient`] implementation for the Gemini API.
//!
//! Sends one stateless `generateContent` request per prompt. The API key is
//! wrapped in [`secrecy::SecretString`] and only exposed when building the
//! request header.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use chatrelay_core::llm::client::CompletionClient;
use chatrelay_types::error::CompletionError;

use super::types::{GeminiErrorResponse, GenerateContentRequest, GenerateContentResponse};

/// Google Gemini completion client.
///
/// Deliberately not `Debug`: it holds the API key.
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
}

impl GeminiClient {
    pub const DEFAULT_BASE_URL: &'static str = "https://generativelanguage.googleapis.com";

    /// Create a new client.
    ///
    /// `base_url` has any trailing slash removed. Fails with
    /// [`CompletionError::InvalidRequest`] for an empty model name or when the
    /// HTTP client cannot be built.
    pub fn new(
        api_key: SecretString,
        model: String,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, CompletionError> {
        if model.trim().is_empty() {
            return Err(CompletionError::InvalidRequest(
                "model name must not be empty".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CompletionError::InvalidRequest(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
        })
    }

    fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

/// Map a non-success status and its body onto a [`CompletionError`].
fn error_for_status(
    status: reqwest::StatusCode,
    retry_after: Option<&str>,
    body: &str,
) -> CompletionError {
    let detail = serde_json::from_str::<GeminiErrorResponse>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.to_string());

    match status.as_u16() {
        401 | 403 => CompletionError::AuthenticationFailed,
        429 => CompletionError::RateLimited {
            retry_after_ms: retry_after
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(|secs| secs * 1000),
        },
        _ => CompletionError::Provider {
            message: format!("HTTP {status}: {detail}"),
        },
    }
}

impl CompletionClient for GeminiClient {
    fn name(&self) -> &str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        let body = GenerateContentRequest::single_prompt(prompt);

        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CompletionError::Timeout
                } else {
                    CompletionError::Provider {
                        message: format!("HTTP request failed: {e}"),
                    }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            let error_body = response.text().await.unwrap_or_default();
            return Err(error_for_status(status, retry_after.as_deref(), &error_body));
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                CompletionError::Timeout
            } else {
                CompletionError::Deserialization(format!("failed to parse response: {e}"))
            }
        })?;

        match parsed.text() {
            Some(text) => Ok(text),
            None => {
                let reason = parsed
                    .prompt_feedback
                    .and_then(|f| f.block_reason)
                    .unwrap_or_else(|| "none".to_string());
                tracing::debug!(block_reason = %reason, "Gemini returned no candidates");
                Ok(String::new())
            }
        }
    }
}
