//! HTTP contract integration tests
//!
//! Exercises the full router in-process: ingress validation, webhook
//! correlation, resolution polling semantics, the debug listing, and the
//! health probe. The queue stays disabled so every test runs hermetically.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use a3s_relay::config::RelayConfig;
use a3s_relay::queue::QueuePublisher;
use a3s_relay::server::router;
use a3s_relay::server::state::AppState;
use a3s_relay::store::MessageStore;

const BOUNDARY: &str = "relay-test-boundary";

fn test_app() -> axum::Router {
    let config = RelayConfig::default();
    let store = Arc::new(MessageStore::new());
    let publisher = Arc::new(QueuePublisher::start(config.queue.clone()));
    router::build(AppState::new(store, publisher, Arc::new(config)))
}

fn text_part(name: &str, value: &str) -> Vec<u8> {
    format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
    )
    .into_bytes()
}

fn file_part(name: &str, filename: &str, mimetype: &str, bytes: &[u8]) -> Vec<u8> {
    let mut part = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: {mimetype}\r\n\r\n"
    )
    .into_bytes();
    part.extend_from_slice(bytes);
    part.extend_from_slice(b"\r\n");
    part
}

fn multipart_request(uri: &str, parts: Vec<Vec<u8>>) -> Request<Body> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(&part);
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn upload_text(app: &axum::Router, description: &str) -> String {
    let response = app
        .clone()
        .oneshot(multipart_request(
            "/upload",
            vec![text_part("description", description)],
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    json["data"]["messageId"].as_str().unwrap().to_string()
}

// ─── Health ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_health_reports_queue_disconnected() {
    let app = test_app();

    let response = app.oneshot(get_request("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["rabbitmqConnected"], false);
    assert!(json["timestamp"].is_string());
}

// ─── Ingress ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_upload_text_only_creates_pending_entry() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(multipart_request(
            "/upload",
            vec![text_part("description", "hola")],
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["description"], "hola");
    assert_eq!(json["data"]["hasImage"], false);
    assert!(json["data"]["timestamp"].is_string());

    let message_id = json["data"]["messageId"].as_str().unwrap();
    let response = app
        .oneshot(get_request(&format!("/api/response/{message_id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["hasResponse"], false);
    assert!(json["data"]["response"].is_null());
    assert!(json["data"]["responseTimestamp"].is_null());
}

#[tokio::test]
async fn test_upload_image_only() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(multipart_request(
            "/upload",
            vec![file_part("image", "photo.png", "image/png", b"\x89PNG fake")],
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["hasImage"], true);
    assert_eq!(json["data"]["description"], "");
}

#[tokio::test]
async fn test_upload_with_text_and_image() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(multipart_request(
            "/upload",
            vec![
                text_part("description", "mira esta foto"),
                file_part("image", "photo.jpg", "image/jpeg", b"fake jpeg"),
            ],
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["hasImage"], true);
    assert_eq!(json["data"]["description"], "mira esta foto");
}

#[tokio::test]
async fn test_upload_rejects_empty_submission() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(multipart_request(
            "/upload",
            vec![text_part("description", "")],
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("required"));

    // No entry was created
    let response = app.oneshot(get_request("/api/debug/messages")).await.unwrap();
    let json = body_json(response).await;
    assert_eq!(json["totalMessages"], 0);
}

#[tokio::test]
async fn test_upload_rejects_non_image_file() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(multipart_request(
            "/upload",
            vec![file_part("image", "notes.txt", "text/plain", b"not an image")],
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("image"));

    let response = app.oneshot(get_request("/api/debug/messages")).await.unwrap();
    let json = body_json(response).await;
    assert_eq!(json["totalMessages"], 0);
}

#[tokio::test]
async fn test_upload_rejects_oversized_image() {
    let app = test_app();

    let oversized = vec![0u8; 10 * 1024 * 1024 + 1];
    let response = app
        .clone()
        .oneshot(multipart_request(
            "/upload",
            vec![file_part("image", "big.png", "image/png", &oversized)],
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app.oneshot(get_request("/api/debug/messages")).await.unwrap();
    let json = body_json(response).await;
    assert_eq!(json["totalMessages"], 0);
}

// ─── Callback ────────────────────────────────────────────────────

#[tokio::test]
async fn test_webhook_unknown_id_is_dropped() {
    let app = test_app();

    let response = app
        .oneshot(multipart_request(
            "/webhook/response/never-issued",
            vec![text_part("text", "listo")],
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(response).await;
    assert_eq!(json["messageId"], "never-issued");
}

#[tokio::test]
async fn test_webhook_applies_default_text() {
    let app = test_app();
    let message_id = upload_text(&app, "hola").await;

    let response = app
        .clone()
        .oneshot(multipart_request(
            &format!("/webhook/response/{message_id}"),
            vec![file_part("data", "out.png", "image/png", b"result")],
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(get_request(&format!("/api/response/{message_id}")))
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["data"]["response"]["text"], "Imagen procesada exitosamente");
}

#[tokio::test]
async fn test_webhook_accepts_any_attachment_type() {
    let app = test_app();
    let message_id = upload_text(&app, "hola").await;

    let response = app
        .clone()
        .oneshot(multipart_request(
            &format!("/webhook/response/{message_id}"),
            vec![
                text_part("text", "aquí tienes"),
                file_part("data", "report.pdf", "application/pdf", b"%PDF-1.4 fake"),
            ],
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(get_request(&format!("/api/response/{message_id}")))
        .await
        .unwrap();
    let json = body_json(response).await;
    let image = json["data"]["response"]["image"].as_str().unwrap();
    assert!(image.starts_with("data:application/pdf;base64,"));
}

#[tokio::test]
async fn test_duplicate_webhook_overwrites() {
    let app = test_app();
    let message_id = upload_text(&app, "hola").await;

    for text in ["first", "second"] {
        let response = app
            .clone()
            .oneshot(multipart_request(
                &format!("/webhook/response/{message_id}"),
                vec![text_part("text", text)],
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app
        .oneshot(get_request(&format!("/api/response/{message_id}")))
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["data"]["response"]["text"], "second");
}

// ─── Resolution ──────────────────────────────────────────────────

#[tokio::test]
async fn test_resolution_unknown_id() {
    let app = test_app();

    let response = app
        .oneshot(get_request("/api/response/never-issued"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(response).await;
    assert_eq!(json["messageId"], "never-issued");
}

#[tokio::test]
async fn test_full_round_trip() {
    let app = test_app();

    // Submit
    let message_id = upload_text(&app, "hola").await;

    // Pending, idempotently
    for _ in 0..3 {
        let response = app
            .clone()
            .oneshot(get_request(&format!("/api/response/{message_id}")))
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json["data"]["hasResponse"], false);
    }

    // Worker replies
    let response = app
        .clone()
        .oneshot(multipart_request(
            &format!("/webhook/response/{message_id}"),
            vec![text_part("text", "listo")],
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["messageId"], message_id);

    // Resolved, idempotently, with a stable payload
    for _ in 0..3 {
        let response = app
            .clone()
            .oneshot(get_request(&format!("/api/response/{message_id}")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["data"]["hasResponse"], true);
        assert_eq!(json["data"]["response"]["text"], "listo");
        assert!(json["data"]["responseTimestamp"].is_string());
    }
}

// ─── Concurrency & debug listing ─────────────────────────────────

#[tokio::test]
async fn test_concurrent_uploads_produce_distinct_entries() {
    let app = test_app();

    let mut handles = Vec::new();
    for i in 0..16 {
        let app = app.clone();
        handles.push(tokio::spawn(async move {
            let response = app
                .oneshot(multipart_request(
                    "/upload",
                    vec![text_part("description", &format!("mensaje {i}"))],
                ))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            let json = body_json(response).await;
            json["data"]["messageId"].as_str().unwrap().to_string()
        }));
    }

    let mut ids = std::collections::HashSet::new();
    for handle in handles {
        ids.insert(handle.await.unwrap());
    }
    assert_eq!(ids.len(), 16);

    let response = app.oneshot(get_request("/api/debug/messages")).await.unwrap();
    let json = body_json(response).await;
    assert_eq!(json["totalMessages"], 16);
}

#[tokio::test]
async fn test_debug_listing_shape() {
    let app = test_app();
    let message_id = upload_text(&app, "hola").await;

    let response = app
        .oneshot(get_request("/api/debug/messages"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["totalMessages"], 1);

    let entry = &json["messages"][0];
    assert_eq!(entry["messageId"], message_id);
    assert_eq!(entry["hasResponse"], false);
    assert!(entry["timestamp"].is_string());
}
