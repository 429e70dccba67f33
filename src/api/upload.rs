use axum::body::Bytes;
use axum::extract::multipart::Field;
use axum::extract::{Multipart, State};
use axum::Json;

use crate::api::types::{UploadData, UploadResponse};
use crate::error::{RelayError, Result};
use crate::server::state::AppState;
use crate::types::{new_message_id, to_data_uri, ImageMetadata, QueueEnvelope};

/// Ceiling for uploaded file payloads (10 MiB)
pub const MAX_FILE_BYTES: usize = 10 * 1024 * 1024;

/// POST /upload - Ingress: accept a submission and hand it to the worker.
///
/// Multipart fields: `description` (text, optional) and `image` (file,
/// optional, `image/*` only, capped at [`MAX_FILE_BYTES`]). At least one of
/// the two must be present. The submission is stored before the publish
/// attempt; a down broker never fails the request.
pub async fn handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    let mut description: Option<String> = None;
    let mut image: Option<ImagePart> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| RelayError::Multipart(e.to_string()))?
    {
        match field.name() {
            Some("description") => {
                description = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| RelayError::Multipart(e.to_string()))?,
                );
            }
            Some("image") => {
                image = Some(read_image_field(field).await?);
            }
            _ => {}
        }
    }

    let description = description.unwrap_or_default();
    if description.is_empty() && image.is_none() {
        return Err(RelayError::EmptySubmission);
    }

    let message_id = new_message_id();
    let webhook_url = format!(
        "{}/webhook/response/{}",
        state.config.callback_base(),
        message_id
    );

    let (data_uri, metadata) = match &image {
        Some(part) => (
            Some(to_data_uri(&part.mimetype, &part.bytes)),
            Some(ImageMetadata {
                filename: part.filename.clone(),
                size: part.bytes.len() as u64,
                mimetype: part.mimetype.clone(),
            }),
        ),
        None => (None, None),
    };

    let envelope = QueueEnvelope::chat(
        message_id.clone(),
        description.clone(),
        data_uri,
        metadata,
        webhook_url,
    );
    let timestamp = envelope.timestamp;

    state.store.insert(envelope.clone()).await;
    // Best-effort hand-off; a failure is logged inside the publisher
    state.publisher.publish(&envelope).await;

    tracing::info!(
        message_id = %message_id,
        has_image = image.is_some(),
        "Submission accepted"
    );

    Ok(Json(UploadResponse {
        success: true,
        message: "Message processed successfully".to_string(),
        data: UploadData {
            message_id,
            has_image: image.is_some(),
            description,
            timestamp,
        },
    }))
}

struct ImagePart {
    filename: String,
    mimetype: String,
    bytes: Bytes,
}

async fn read_image_field(field: Field<'_>) -> Result<ImagePart> {
    let filename = field.file_name().unwrap_or("upload").to_string();
    let mimetype = field
        .content_type()
        .unwrap_or("application/octet-stream")
        .to_string();

    if !mimetype.starts_with("image/") {
        return Err(RelayError::UnsupportedMediaType(mimetype));
    }

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

    Ok(ImagePart {
        filename,
        mimetype,
        bytes,
    })
}
