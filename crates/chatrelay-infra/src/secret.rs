//! Completion service credential lookup.
//!
//! The API key comes from the environment only. It is wrapped in
//! [`SecretString`] immediately and only ever logged through [`mask_secret`].

use secrecy::SecretString;
use thiserror::Error;

/// Environment variable holding the Gemini API key.
pub const API_KEY_VAR: &str = "GEMINI_API_KEY";

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("{0} environment variable is missing")]
    Missing(String),

    #[error("{0} environment variable is empty")]
    Empty(String),
}

/// Read the API key named `var` through `lookup` (normally `std::env::var`).
///
/// A variable holding invalid Unicode is treated as missing.
pub fn resolve_api_key_with<F>(var: &str, lookup: F) -> Result<SecretString, CredentialError>
where
    F: Fn(&str) -> Option<String>,
{
    let value = lookup(var).ok_or_else(|| CredentialError::Missing(var.to_string()))?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CredentialError::Empty(var.to_string()));
    }
    Ok(SecretString::from(trimmed.to_string()))
}

/// Mask a secret for display: first four characters, then `****`.
pub fn mask_secret(value: &str) -> String {
    let prefix: String = value.chars().take(4).collect();
    if value.chars().count() <= 8 {
        "****".to_string()
    } else {
        format!("{prefix}****")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_resolve_present_key() {
        let key = resolve_api_key_with("K", |_| Some("  AIzaSyExample123  ".to_string())).unwrap();
        assert_eq!(key.expose_secret(), "AIzaSyExample123");
    }

    #[test]
    fn test_resolve_missing_key() {
        let err = resolve_api_key_with(API_KEY_VAR, |_| None).unwrap_err();
        assert!(matches!(err, CredentialError::Missing(_)));
        assert_eq!(err.to_string(), "GEMINI_API_KEY environment variable is missing");
    }

    #[test]
    fn test_resolve_blank_key() {
        let err = resolve_api_key_with("K", |_| Some("   ".to_string())).unwrap_err();
        assert!(matches!(err, CredentialError::Empty(_)));
    }

    #[test]
    fn test_mask_secret() {
        assert_eq!(mask_secret("AIzaSyExample123"), "AIza****");
        assert_eq!(mask_secret("short"), "****");
        assert_eq!(mask_secret(""), "****");
    }
}
