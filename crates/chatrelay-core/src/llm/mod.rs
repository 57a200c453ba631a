//! Completion service abstraction.
//!
//! - `client`: The `CompletionClient` trait
//! - `box_client`: Type-erased `BoxCompletionClient`

pub mod box_client;
pub mod client;
