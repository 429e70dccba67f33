pub mod router;
pub mod state;

use std::sync::Arc;
use std::time::Duration;

use crate::config::RelayConfig;
use crate::error::{RelayError, Result};
use crate::queue::QueuePublisher;
use crate::store::MessageStore;

/// Cadence of the store eviction sweep when a TTL is configured
const EVICTION_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Start the HTTP server with the given configuration.
pub async fn start(config: RelayConfig) -> Result<()> {
    let store = Arc::new(MessageStore::new());
    let publisher = Arc::new(QueuePublisher::start(config.queue.clone()));

    if config.store.response_ttl_secs > 0 {
        spawn_eviction_sweep(Arc::clone(&store), config.store.response_ttl_secs);
    }

    let bind_addr = config.bind_address();
    let app_state = state::AppState::new(store, publisher, Arc::new(config));
    let app = router::build(app_state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| RelayError::Server(format!("Failed to bind to {bind_addr}: {e}")))?;

    tracing::info!("Server listening on {bind_addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| RelayError::Server(format!("Server error: {e}")))?;

    Ok(())
}

fn spawn_eviction_sweep(store: Arc<MessageStore>, ttl_secs: u64) {
    tracing::info!(ttl_secs, "Store eviction enabled");
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(EVICTION_SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            store.evict_expired(ttl_secs).await;
        }
    });
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutting down gracefully"),
        Err(e) => tracing::error!(error = %e, "Failed to listen for shutdown signal"),
    }
}
