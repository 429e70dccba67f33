use axum::extract::{Path, State};
use axum::Json;

use crate::api::types::{DebugMessagesResponse, ResolutionData, ResolutionResponse};
use crate::error::{RelayError, Result};
use crate::server::state::AppState;

/// GET /api/response/:message_id - Resolution: poll for the worker's reply.
///
/// Read-only and idempotent; the browser calls this repeatedly until
/// `hasResponse` flips to true or its retry budget runs out.
pub async fn resolution_handler(
    State(state): State<AppState>,
    Path(message_id): Path<String>,
) -> Result<Json<ResolutionResponse>> {
    let entry = state
        .store
        .get(&message_id)
        .await
        .ok_or_else(|| RelayError::MessageNotFound(message_id.clone()))?;

    Ok(Json(ResolutionResponse {
        success: true,
        data: ResolutionData {
            message_id,
            has_response: entry.response.is_some(),
            response: entry.response,
            response_timestamp: entry.response_at,
        },
    }))
}

/// GET /api/debug/messages - Summaries of every stored entry.
pub async fn debug_handler(State(state): State<AppState>) -> Json<DebugMessagesResponse> {
    let messages = state.store.list().await;
    Json(DebugMessagesResponse {
        success: true,
        total_messages: messages.len(),
        messages,
    })
}
