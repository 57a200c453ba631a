//! Relay logic and port trait definitions for Chatrelay.
//!
//! This crate defines the "ports" (`MessageStore`, `CompletionClient`) that the
//! infrastructure layer implements, plus the relay and history services built
//! on them. It depends only on `chatrelay-types` -- never on
//! `chatrelay-infra` or any database/IO crate.

pub mod chat;
pub mod llm;
pub mod store;
