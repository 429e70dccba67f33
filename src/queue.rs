//! Queue publisher — connect, reconnect, publish
//!
//! `QueuePublisher` owns the process's single broker connection and hands
//! submissions to the external worker through a durable JetStream stream.
//! Connection management is deliberately simple: a background task retries
//! at a flat interval with no cap, and publishing while disconnected is a
//! logged no-op so ingress never fails because the transport is down.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_nats::jetstream;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::config::QueueConfig;
use crate::error::{RelayError, Result};
use crate::types::QueueEnvelope;

/// Delay between connection attempts. Flat, retried indefinitely.
const RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// Timeout for establishing the TCP connection
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Publishes queue envelopes to the worker's stream
///
/// At most one connection is live per process. `publish` is best-effort:
/// failures are logged and the reconnect loop restarts, but the caller
/// never sees an error.
pub struct QueuePublisher {
    config: QueueConfig,
    handle: Arc<RwLock<Option<jetstream::Context>>>,
    reconnecting: Arc<AtomicBool>,
}

impl QueuePublisher {
    /// Create the publisher and, when enabled, start the connect loop.
    pub fn start(config: QueueConfig) -> Self {
        let publisher = Self {
            config,
            handle: Arc::new(RwLock::new(None)),
            reconnecting: Arc::new(AtomicBool::new(false)),
        };

        if publisher.config.enabled {
            publisher.spawn_connect_loop();
        } else {
            tracing::info!("Queue publishing is disabled");
        }
        publisher
    }

    /// Whether a broker connection is currently live
    pub async fn is_connected(&self) -> bool {
        self.handle.read().await.is_some()
    }

    /// Publish an envelope to the worker's subject.
    ///
    /// Never fails: when the queue is disabled or the connection is down
    /// the envelope is dropped with a log line, and a publish error tears
    /// down the handle so the connect loop can re-establish it.
    pub async fn publish(&self, envelope: &QueueEnvelope) {
        if !self.config.enabled {
            tracing::debug!(message_id = %envelope.id, "Queue disabled, envelope not sent");
            return;
        }

        let context = self.handle.read().await.clone();
        let Some(js) = context else {
            tracing::warn!(message_id = %envelope.id, "Queue unavailable, envelope not sent");
            return;
        };

        match publish_envelope(&js, &self.config, envelope).await {
            Ok(()) => {
                tracing::info!(
                    message_id = %envelope.id,
                    subject = %self.config.subject,
                    has_image = envelope.has_image(),
                    webhook_url = %envelope.webhook_url,
                    "Envelope published"
                );
            }
            Err(e) => {
                tracing::error!(message_id = %envelope.id, error = %e, "Publish failed");
                *self.handle.write().await = None;
                self.spawn_connect_loop();
            }
        }
    }

    fn spawn_connect_loop(&self) {
        // One loop at a time; a second failure while reconnecting is a no-op.
        if self
            .reconnecting
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return;
        }

        let config = self.config.clone();
        let handle = Arc::clone(&self.handle);
        let reconnecting = Arc::clone(&self.reconnecting);

        tokio::spawn(async move {
            loop {
                match connect(&config).await {
                    Ok(context) => {
                        *handle.write().await = Some(context);
                        reconnecting.store(false, Ordering::SeqCst);
                        tracing::info!(
                            stream = %config.stream,
                            subject = %config.subject,
                            "Queue connection established"
                        );
                        return;
                    }
                    Err(e) => {
                        tracing::error!(
                            error = %e,
                            retry_secs = RECONNECT_DELAY.as_secs(),
                            "Queue connection failed, retrying"
                        );
                        tokio::time::sleep(RECONNECT_DELAY).await;
                    }
                }
            }
        });
    }
}

/// Connect to the broker and make sure the worker's stream exists
async fn connect(config: &QueueConfig) -> Result<jetstream::Context> {
    let url = config.url.as_deref().ok_or_else(|| {
        RelayError::Config("queue.url is required when the queue is enabled".to_string())
    })?;

    let client = async_nats::ConnectOptions::new()
        .connection_timeout(CONNECT_TIMEOUT)
        .connect(url)
        .await
        .map_err(|e| RelayError::Queue(format!("{}: {}", url, e)))?;

    tracing::info!(url = %url, "Connected to queue broker");

    let js = jetstream::new(client);
    ensure_stream(&js, config).await?;
    Ok(js)
}

/// Ensure the stream exists: durable file storage, work-queue retention,
/// replica count per configuration (3 on a clustered broker gives
/// quorum-style replication).
async fn ensure_stream(js: &jetstream::Context, config: &QueueConfig) -> Result<()> {
    let stream_config = jetstream::stream::Config {
        name: config.stream.clone(),
        subjects: vec![config.subject.clone()],
        storage: jetstream::stream::StorageType::File,
        retention: jetstream::stream::RetentionPolicy::WorkQueue,
        num_replicas: config.replicas,
        ..Default::default()
    };

    js.get_or_create_stream(stream_config).await.map_err(|e| {
        RelayError::Queue(format!(
            "Failed to create/get stream '{}': {}",
            config.stream, e
        ))
    })?;

    tracing::info!(
        stream = %config.stream,
        subject = %config.subject,
        replicas = config.replicas,
        "JetStream stream ready"
    );
    Ok(())
}

async fn publish_envelope(
    js: &jetstream::Context,
    config: &QueueConfig,
    envelope: &QueueEnvelope,
) -> Result<()> {
    let payload = serde_json::to_vec(envelope)?;

    let mut headers = async_nats::HeaderMap::new();
    headers.insert("Nats-Msg-Id", envelope.id.as_str());
    headers.insert("Relay-Published-At", Utc::now().to_rfc3339().as_str());

    js.publish_with_headers(config.subject.clone(), headers, payload.into())
        .await
        .map_err(|e| RelayError::Queue(format!("publish to '{}': {}", config.subject, e)))?
        .await
        .map_err(|e| RelayError::Queue(format!("publish ack: {}", e)))?;

    Ok(())
}
