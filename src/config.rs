//! Relay configuration
//!
//! Loaded from a TOML file with serde field defaults, so a missing file or
//! an empty table yields a working local setup (queue disabled, port 3000).

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{RelayError, Result};

/// User-configurable settings for the relay server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Host address for the HTTP server (default: 127.0.0.1)
    #[serde(default = "default_host")]
    pub host: String,

    /// Port for the HTTP server (default: 3000)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Externally visible base URL used to build webhook callback URLs.
    /// Falls back to `http://localhost:<port>` when unset.
    #[serde(default)]
    pub public_base_url: Option<String>,

    /// Queue transport settings
    #[serde(default)]
    pub queue: QueueConfig,

    /// Correlation store settings
    #[serde(default)]
    pub store: StoreConfig,
}

/// Settings for the queue publisher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueConfig {
    /// Whether to publish submissions to the queue at all (default: false)
    #[serde(default)]
    pub enabled: bool,

    /// Broker connection URL (e.g. `nats://127.0.0.1:4222`).
    /// Required when `enabled` is true.
    #[serde(default)]
    pub url: Option<String>,

    /// JetStream stream name (default: RELAY)
    #[serde(default = "default_stream")]
    pub stream: String,

    /// Subject the worker consumes (default: sebastian)
    #[serde(default = "default_subject")]
    pub subject: String,

    /// Stream replica count. 3 gives quorum-style replication on a
    /// clustered broker; the default of 1 suits single-node development.
    #[serde(default = "default_replicas")]
    pub replicas: usize,
}

/// Settings for the correlation store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Seconds to keep a stored entry before eviction. 0 (the default)
    /// keeps every entry for the process lifetime.
    #[serde(default)]
    pub response_ttl_secs: u64,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_stream() -> String {
    "RELAY".to_string()
}

fn default_subject() -> String {
    "sebastian".to_string()
}

fn default_replicas() -> usize {
    1
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            public_base_url: None,
            queue: QueueConfig::default(),
            store: StoreConfig::default(),
        }
    }
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            url: None,
            stream: default_stream(),
            subject: default_subject(),
            replicas: default_replicas(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            response_ttl_secs: 0,
        }
    }
}

impl RelayConfig {
    /// Load configuration from a TOML file.
    /// Returns default config when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let content = std::fs::read_to_string(path).map_err(|e| {
                    RelayError::Config(format!(
                        "Failed to read config file {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                Ok(toml::from_str(&content)?)
            }
            None => Ok(Self::default()),
        }
    }

    /// Returns the server bind address string (e.g., "127.0.0.1:3000").
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Base URL embedded in the callback URLs handed to the worker.
    pub fn callback_base(&self) -> String {
        match &self.public_base_url {
            Some(base) => base.trim_end_matches('/').to_string(),
            None => format!("http://localhost:{}", self.port),
        }
    }
}
