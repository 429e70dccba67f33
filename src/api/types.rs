//! Request/response bodies for the HTTP API
//!
//! camelCase on the wire; these shapes are what the browser front end and
//! the worker's webhook client parse.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::MessageSummary;
use crate::types::WorkerResponse;

/// Body of a successful `POST /upload`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub success: bool,
    pub message: String,
    pub data: UploadData,
}

/// Echo of the accepted submission
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadData {
    pub message_id: String,
    pub has_image: bool,
    pub description: String,
    pub timestamp: DateTime<Utc>,
}

/// Body of a successful `POST /webhook/response/:message_id`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookAck {
    pub success: bool,
    pub message: String,
    pub message_id: String,
}

/// Body of a successful `GET /api/response/:message_id`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionResponse {
    pub success: bool,
    pub data: ResolutionData,
}

/// Resolution state for one message
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionData {
    pub message_id: String,
    pub has_response: bool,
    /// `null` until the webhook callback arrives
    pub response: Option<WorkerResponse>,
    pub response_timestamp: Option<DateTime<Utc>>,
}

/// Body of `GET /api/debug/messages`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugMessagesResponse {
    pub success: bool,
    pub total_messages: usize,
    pub messages: Vec<MessageSummary>,
}

/// Body of `GET /health`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    /// Queue connectivity. Field name predates the broker swap; the
    /// deployed dashboards key on it.
    pub rabbitmq_connected: bool,
    pub timestamp: DateTime<Utc>,
}
