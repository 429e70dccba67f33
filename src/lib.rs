//! # a3s-relay
//!
//! Chat ingress relay for the A3S ecosystem.
//!
//! ## Overview
//!
//! `a3s-relay` sits between a browser chat front end and an asynchronous
//! worker. A client submits a message (text and/or an image) over HTTP; the
//! relay assigns it a message identifier, hands it to the worker through a
//! durable queue, and later correlates the worker's out-of-band webhook
//! reply back to that identifier so the client can poll for it.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use a3s_relay::config::RelayConfig;
//!
//! # async fn example() -> a3s_relay::Result<()> {
//! let mut config = RelayConfig::default();
//! config.port = 3000;
//!
//! // Serves /upload, /webhook/response/:id, /api/response/:id, /health
//! a3s_relay::server::start(config).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - **MessageStore** — in-memory correlation table keyed by message ID
//! - **QueuePublisher** — owns the queue connection; flat-interval reconnect,
//!   fire-and-forget publish
//! - **api** — HTTP surface: ingress, webhook callback, resolution, health
//! - **poll** — the client-side bounded polling protocol

pub mod api;
pub mod config;
pub mod error;
pub mod poll;
pub mod queue;
pub mod server;
pub mod store;
pub mod types;

// Re-export core types
pub use config::{QueueConfig, RelayConfig, StoreConfig};
pub use error::{RelayError, Result};
pub use poll::{await_response, PollOptions};
pub use queue::QueuePublisher;
pub use store::{MessageStore, MessageSummary, StoredEntry};
pub use types::{
    new_message_id, EnvelopeContent, ImageMetadata, QueueEnvelope, WorkerResponse,
};
