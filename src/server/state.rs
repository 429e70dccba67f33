use std::sync::Arc;

use crate::config::RelayConfig;
use crate::queue::QueuePublisher;
use crate::store::MessageStore;

/// Shared application state accessible to all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<MessageStore>,
    pub publisher: Arc<QueuePublisher>,
    pub config: Arc<RelayConfig>,
}

impl AppState {
    pub fn new(
        store: Arc<MessageStore>,
        publisher: Arc<QueuePublisher>,
        config: Arc<RelayConfig>,
    ) -> Self {
        Self {
            store,
            publisher,
            config,
        }
    }
}
