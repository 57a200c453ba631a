//! Chat HTTP handler.
//!
//! Endpoint:
//! - POST /chat - Relay one message and return the assistant reply

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::http::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub session_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
}

/// POST /chat
///
/// Returns 200 whenever both turns were stored, even if the completion call
/// failed; the failure reply then travels in `reply`.
pub async fn chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let exchange = state.relay.handle_chat(&req.session_id, &req.message).await?;

    Ok(Json(ChatResponse {
        reply: exchange.reply().to_string(),
    }))
}
