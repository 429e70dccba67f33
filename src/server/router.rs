use axum::extract::DefaultBodyLimit;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::state::AppState;
use crate::api;

/// Whole-request body cap. Uploaded files are held to the tighter per-field
/// ceiling in the handlers.
const MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

/// Build the complete axum Router with all API routes.
pub fn build(state: AppState) -> Router {
    api::routes()
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
