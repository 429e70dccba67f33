use axum::extract::{Multipart, Path, State};
use axum::Json;
use chrono::Utc;

use crate::api::types::WebhookAck;
use crate::api::upload::MAX_FILE_BYTES;
use crate::error::{RelayError, Result};
use crate::server::state::AppState;
use crate::types::{to_data_uri, WorkerResponse, DEFAULT_RESPONSE_TEXT};

/// POST /webhook/response/:message_id - Callback: store the worker's reply.
///
/// Multipart fields: `text` (optional) and `data` (file, optional, any
/// media type). An identifier the ingress never issued gets a 404 and the
/// callback is dropped — no retry, no buffering.
pub async fn handler(
    State(state): State<AppState>,
    Path(message_id): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<WebhookAck>> {
    let mut text: Option<String> = None;
    let mut attachment: Option<(String, axum::body::Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| RelayError::Multipart(e.to_string()))?
    {
        match field.name() {
            Some("text") => {
                text = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| RelayError::Multipart(e.to_string()))?,
                );
            }
            Some("data") => {
                let mimetype = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| RelayError::Multipart(e.to_string()))?;
                if bytes.len() > MAX_FILE_BYTES {
                    return Err(RelayError::PayloadTooLarge {
                        limit: MAX_FILE_BYTES,
                        actual: bytes.len(),
                    });
                }
                attachment = Some((mimetype, bytes));
            }
            _ => {}
        }
    }

    tracing::info!(
        message_id = %message_id,
        has_text = text.is_some(),
        has_attachment = attachment.is_some(),
        "Webhook response received"
    );

    let response = WorkerResponse {
        text: text
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| DEFAULT_RESPONSE_TEXT.to_string()),
        image: attachment.map(|(mimetype, bytes)| to_data_uri(&mimetype, &bytes)),
        timestamp: Utc::now(),
    };

    state.store.attach_response(&message_id, response).await?;

    Ok(Json(WebhookAck {
        success: true,
        message: "Response received and stored".to_string(),
        message_id,
    }))
}
