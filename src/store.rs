//! In-memory correlation store
//!
//! `MessageStore` maps a message identifier to its original submission and,
//! once the worker has replied, its response. Entries are written at ingress
//! time, mutated at most once by the webhook callback, and read by the
//! resolution endpoint. Thread-safe via an internal lock; per-key
//! read-modify-write happens under the write lock, so concurrent readers
//! never observe a torn entry.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tokio::sync::RwLock;

use crate::error::{RelayError, Result};
use crate::types::{QueueEnvelope, WorkerResponse};

/// One correlation record: a submission and its eventual response
#[derive(Debug, Clone)]
pub struct StoredEntry {
    /// The envelope as published to the queue
    pub envelope: QueueEnvelope,

    /// When the submission was accepted
    pub created_at: DateTime<Utc>,

    /// The worker's reply, absent until the webhook callback arrives
    pub response: Option<WorkerResponse>,

    /// When the reply arrived
    pub response_at: Option<DateTime<Utc>>,
}

/// Summary row for the debug listing
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageSummary {
    pub message_id: String,
    pub has_response: bool,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_timestamp: Option<DateTime<Utc>>,
}

/// In-memory correlation table keyed by message identifier
pub struct MessageStore {
    entries: RwLock<HashMap<String, StoredEntry>>,
}

impl MessageStore {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Store a fresh submission with no response.
    ///
    /// Identifiers are unique for the process lifetime; a duplicate would
    /// silently replace the previous entry, so it is logged loudly.
    pub async fn insert(&self, envelope: QueueEnvelope) {
        let id = envelope.id.clone();
        let entry = StoredEntry {
            envelope,
            created_at: Utc::now(),
            response: None,
            response_at: None,
        };

        let mut entries = self.entries.write().await;
        if entries.insert(id.clone(), entry).is_some() {
            tracing::warn!(message_id = %id, "Duplicate message ID overwrote an existing entry");
        }
    }

    /// Attach the worker's response to a stored entry.
    ///
    /// The first and only expected mutation in an entry's lifecycle. A
    /// repeated callback for the same identifier overwrites the previous
    /// response; an unknown identifier is an error and mutates nothing.
    pub async fn attach_response(&self, id: &str, response: WorkerResponse) -> Result<()> {
        let mut entries = self.entries.write().await;
        let entry = entries
            .get_mut(id)
            .ok_or_else(|| RelayError::MessageNotFound(id.to_string()))?;

        if entry.response.is_some() {
            tracing::debug!(message_id = %id, "Overwriting a previously stored response");
        }
        entry.response = Some(response);
        entry.response_at = Some(Utc::now());

        tracing::info!(message_id = %id, "Response stored");
        Ok(())
    }

    /// Fetch a snapshot of one entry
    pub async fn get(&self, id: &str) -> Option<StoredEntry> {
        self.entries.read().await.get(id).cloned()
    }

    /// Summaries of all stored entries, for the debug listing
    pub async fn list(&self) -> Vec<MessageSummary> {
        self.entries
            .read()
            .await
            .iter()
            .map(|(id, entry)| MessageSummary {
                message_id: id.clone(),
                has_response: entry.response.is_some(),
                timestamp: entry.created_at,
                response_timestamp: entry.response_at,
            })
            .collect()
    }

    /// Number of stored entries
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Drop entries older than `max_age_secs`, returning how many were evicted.
    ///
    /// Only called when a retention TTL is configured; the default
    /// configuration never evicts.
    pub async fn evict_expired(&self, max_age_secs: u64) -> usize {
        let cutoff = Utc::now() - Duration::seconds(max_age_secs as i64);
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.created_at >= cutoff);
        let evicted = before - entries.len();

        if evicted > 0 {
            tracing::info!(evicted, remaining = entries.len(), "Evicted expired entries");
        }
        evicted
    }
}

impl Default for MessageStore {
    fn default() -> Self {
        Self::new()
    }
}
