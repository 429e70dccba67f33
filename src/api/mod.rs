//! HTTP surface of the relay
//!
//! | Method/Path | Description |
//! |---|---|
//! | `GET /health` | Liveness probe with queue connectivity |
//! | `POST /upload` | Ingress: accept a text/image submission |
//! | `POST /webhook/response/:message_id` | Callback: worker reply |
//! | `GET /api/response/:message_id` | Resolution: poll for a reply |
//! | `GET /api/debug/messages` | Debug listing of stored entries |

pub mod health;
pub mod response;
pub mod types;
pub mod upload;
pub mod webhook;

use axum::routing::{get, post};
use axum::Router;

use crate::server::state::AppState;

/// Build the relay API routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::handler))
        .route("/upload", post(upload::handler))
        .route("/webhook/response/:message_id", post(webhook::handler))
        .route("/api/response/:message_id", get(response::resolution_handler))
        .route("/api/debug/messages", get(response::debug_handler))
}
