use axum::extract::State;
use axum::Json;
use chrono::Utc;

use crate::api::types::HealthResponse;
use crate::server::state::AppState;

/// GET /health - Liveness probe with queue connectivity.
pub async fn handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        rabbitmq_connected: state.publisher.is_connected().await,
        timestamp: Utc::now(),
    })
}
