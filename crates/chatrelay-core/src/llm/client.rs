//! CompletionClient trait definition.
//!
//! The external generative-AI service is an opaque collaborator: one prompt
//! in, one reply out. No streaming and no conversation context.

use chatrelay_types::error::CompletionError;

/// Trait for completion service backends (Gemini, test doubles, etc.).
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
/// Implementations live in chatrelay-infra (e.g., `GeminiClient`).
pub trait CompletionClient: Send + Sync {
    /// Human-readable provider name (e.g., "gemini").
    fn name(&self) -> &str;

    /// Model identifier sent with each request.
    fn model(&self) -> &str;

    /// Send a single prompt and receive the full reply text.
    ///
    /// An empty reply is a success, not an error.
    fn complete(
        &self,
        prompt: &str,
    ) -> impl std::future::Future<Output = Result<String, CompletionError>> + Send;
}
