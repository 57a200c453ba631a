//! History HTTP handler.
//!
//! Endpoint:
//! - GET /history/{session_id} - Full transcript, oldest first

use axum::Json;
use axum::extract::{Path, State};

use chatrelay_types::chat::HistoryEntry;

use crate::http::error::AppError;
use crate::state::AppState;

/// GET /history/{session_id}
///
/// Unknown sessions yield an empty array, not 404.
pub async fn get_history(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<Vec<HistoryEntry>>, AppError> {
    let entries = state.history.get_history(&session_id).await?;
    Ok(Json(entries))
}
