//! Core wire types for the relay
//!
//! All types use camelCase JSON serialization for wire compatibility. The
//! `QueueEnvelope` schema is the contract the external worker consumes and
//! must remain stable.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Type tag carried by every queue envelope
pub const CHAT_MESSAGE_TYPE: &str = "chat_message";

/// Fallback text attached to webhook replies that carry no text field
pub const DEFAULT_RESPONSE_TEXT: &str = "Imagen procesada exitosamente";

/// Generate a fresh message identifier
///
/// Millisecond timestamp plus a 9-character random suffix
/// (e.g. `1754560000000-k3jq8xv2a`): collision-resistant for the process
/// lifetime and sortable by submission time.
pub fn new_message_id() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&rand::distributions::Alphanumeric)
        .take(9)
        .map(char::from)
        .collect();
    format!("{}-{}", Utc::now().timestamp_millis(), suffix.to_lowercase())
}

/// Encode a binary payload as a `data:` URI for JSON transport
pub fn to_data_uri(mimetype: &str, bytes: &[u8]) -> String {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    format!("data:{};base64,{}", mimetype, STANDARD.encode(bytes))
}

/// The message published to the queue and consumed by the worker
///
/// Serialized as JSON with the fields `id`, `timestamp`, `type`, `content`,
/// `metadata` (omitted when no image is attached) and `webhookUrl`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueEnvelope {
    /// Message identifier, also embedded in `webhook_url`
    pub id: String,

    /// Submission time (RFC 3339)
    pub timestamp: DateTime<Utc>,

    /// Constant type tag (`chat_message`)
    #[serde(rename = "type")]
    pub kind: String,

    /// Submitted text and image payload
    pub content: EnvelopeContent,

    /// Image metadata, absent for text-only submissions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ImageMetadata>,

    /// Callback URL the worker posts its reply to
    pub webhook_url: String,
}

impl QueueEnvelope {
    /// Build a chat-message envelope for a fresh submission
    pub fn chat(
        id: impl Into<String>,
        text: impl Into<String>,
        image: Option<String>,
        metadata: Option<ImageMetadata>,
        webhook_url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            timestamp: Utc::now(),
            kind: CHAT_MESSAGE_TYPE.to_string(),
            content: EnvelopeContent {
                text: text.into(),
                image,
            },
            metadata,
            webhook_url: webhook_url.into(),
        }
    }

    /// Whether the submission carried an image
    pub fn has_image(&self) -> bool {
        self.content.image.is_some()
    }
}

/// Submitted message content
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvelopeContent {
    /// Submitted text, empty string when only an image was sent
    pub text: String,

    /// Image as a `data:<mime>;base64,…` URI, `null` when absent
    pub image: Option<String>,
}

/// Metadata describing an uploaded image
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageMetadata {
    /// Original filename as supplied by the client
    pub filename: String,

    /// Decoded size in bytes
    pub size: u64,

    /// Declared media type (e.g. `image/png`)
    pub mimetype: String,
}

/// The worker's reply, delivered through the webhook callback
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerResponse {
    /// Reply text; [`DEFAULT_RESPONSE_TEXT`] when the webhook carried none
    pub text: String,

    /// Reply payload as a `data:` URI, omitted when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Arrival time (RFC 3339)
    pub timestamp: DateTime<Utc>,
}
