//! Configuration types for Chatrelay.
//!
//! `RelayConfig` represents the `config.toml` in the data directory. Every
//! field has a default so an empty or missing file is valid.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What the assistant turn holds when the completion call fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// A fixed, user-safe apology. Raw errors only reach the logs.
    #[default]
    Placeholder,
    /// `"Error: {error}"`, exposing the provider error to the caller.
    Verbose,
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailurePolicy::Placeholder => write!(f, "placeholder"),
            FailurePolicy::Verbose => write!(f, "verbose"),
        }
    }
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "placeholder" => Ok(FailurePolicy::Placeholder),
            "verbose" => Ok(FailurePolicy::Verbose),
            other => Err(format!("invalid failure policy: '{other}'")),
        }
    }
}

/// Top-level configuration for the relay.
///
/// Loaded from `~/.chatrelay/config.toml`, then overridden by `CHATRELAY_*`
/// environment variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Model identifier passed to the completion service.
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL of the completion service.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-call timeout for the completion service, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default)]
    pub failure_policy: FailurePolicy,

    /// Explicit database URL. When absent the database lives in the data directory.
    #[serde(default)]
    pub database_url: Option<String>,
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_request_timeout_secs() -> u64 {
    60
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            failure_policy: FailurePolicy::default(),
            database_url: None,
        }
    }
}
