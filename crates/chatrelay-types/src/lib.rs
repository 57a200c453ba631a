//! Shared domain types for Chatrelay.
//!
//! This crate contains the domain types used across the relay: chat turns,
//! history entries, configuration, and the store/completion error types.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
