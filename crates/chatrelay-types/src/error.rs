use thiserror::Error;

/// Errors from message store operations (used by trait definitions in chatrelay-core).
///
/// Both variants are fatal to the request that hit them; nothing retries.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("corrupt row: {0}")]
    Corrupt(String),
}

/// Errors from the external completion service.
///
/// The relay never propagates these; they are converted into the failure reply.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("provider error: {message}")]
    Provider { message: String },

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("rate limited (retry after {retry_after_ms:?}ms)")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("request timed out")]
    Timeout,

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}
