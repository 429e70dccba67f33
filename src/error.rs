//! Error types for a3s-relay

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// Errors that can occur in the relay
#[derive(Debug, Error)]
pub enum RelayError {
    /// Submission carried neither text nor an image
    #[error("Description or image is required")]
    EmptySubmission,

    /// Uploaded file is not an image
    #[error("Only image files are allowed, got '{0}'")]
    UnsupportedMediaType(String),

    /// Uploaded file exceeds the size ceiling
    #[error("File of {actual} bytes exceeds the {limit} byte limit")]
    PayloadTooLarge { limit: usize, actual: usize },

    /// Malformed multipart request body
    #[error("Invalid multipart body: {0}")]
    Multipart(String),

    /// Identifier not present in the correlation store
    #[error("Message ID not found: {0}")]
    MessageNotFound(String),

    /// Queue connection or publish failure
    #[error("Queue error: {0}")]
    Queue(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Outbound HTTP failure (response polling)
    #[error("HTTP client error: {0}")]
    Http(String),

    /// Serialization/deserialization failure
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML deserialization failure
    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Server startup or runtime error
    #[error("Server error: {0}")]
    Server(String),
}

/// Result type alias for relay operations
pub type Result<T> = std::result::Result<T, RelayError>;

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = match &self {
            RelayError::EmptySubmission
            | RelayError::UnsupportedMediaType(_)
            | RelayError::PayloadTooLarge { .. }
            | RelayError::Multipart(_) => StatusCode::BAD_REQUEST,
            RelayError::MessageNotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = match &self {
            // Unknown-identifier bodies carry the offending id so the
            // worker can log which callback was dropped.
            RelayError::MessageNotFound(id) => serde_json::json!({
                "error": "Message ID not found",
                "messageId": id,
            }),
            _ if status == StatusCode::INTERNAL_SERVER_ERROR => {
                tracing::error!(error = %self, "Request failed");
                serde_json::json!({ "error": "Internal server error" })
            }
            _ => serde_json::json!({ "error": self.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}
