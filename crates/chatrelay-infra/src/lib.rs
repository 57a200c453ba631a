//! Infrastructure implementations for Chatrelay.
//!
//! Concrete adapters for the traits in `chatrelay-core`: the SQLite message
//! store, the Gemini completion client, plus config and credential loading.

pub mod config;
pub mod llm;
pub mod secret;
pub mod sqlite;
