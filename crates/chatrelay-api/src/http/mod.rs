//! HTTP API layer for Chatrelay.
//!
//! Axum router exposing `/chat`, `/history/{session_id}` and `/health`, with
//! permissive CORS for the browser frontend.

pub mod error;
pub mod handlers;
pub mod router;
