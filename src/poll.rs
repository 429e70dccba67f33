//! Client-side response polling
//!
//! The browser front end drives this protocol itself; this module is the
//! same bounded loop for headless callers and tests: wait a fixed initial
//! delay, then poll the resolution endpoint at a fixed interval until the
//! response arrives or the attempt budget runs out.

use std::time::Duration;

use crate::api::types::ResolutionResponse;
use crate::error::{RelayError, Result};
use crate::types::WorkerResponse;

/// Timing and budget for the polling loop
#[derive(Debug, Clone)]
pub struct PollOptions {
    /// Wait before the first poll (default: 2s)
    pub initial_delay: Duration,

    /// Wait between polls (default: 2s)
    pub interval: Duration,

    /// Attempt budget (default: 30, a ~60 second window)
    pub max_attempts: u32,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(2),
            interval: Duration::from_secs(2),
            max_attempts: 30,
        }
    }
}

/// Poll the resolution endpoint until the worker's reply arrives.
///
/// Returns `Ok(None)` when the budget is exhausted — a best-effort timeout,
/// not an error. Transient transport failures are logged and the loop keeps
/// going; an unknown identifier is terminal.
pub async fn await_response(
    base_url: &str,
    message_id: &str,
    options: &PollOptions,
) -> Result<Option<WorkerResponse>> {
    let client = reqwest::Client::new();
    let url = format!(
        "{}/api/response/{}",
        base_url.trim_end_matches('/'),
        message_id
    );

    tokio::time::sleep(options.initial_delay).await;

    for attempt in 1..=options.max_attempts {
        match client.get(&url).send().await {
            Ok(response) if response.status() == reqwest::StatusCode::NOT_FOUND => {
                return Err(RelayError::MessageNotFound(message_id.to_string()));
            }
            Ok(response) if response.status().is_success() => {
                let resolution: ResolutionResponse = response
                    .json()
                    .await
                    .map_err(|e| RelayError::Http(format!("decode resolution: {e}")))?;
                if resolution.data.has_response {
                    tracing::debug!(message_id = %message_id, attempt, "Response arrived");
                    return Ok(resolution.data.response);
                }
            }
            Ok(response) => {
                tracing::debug!(
                    message_id = %message_id,
                    attempt,
                    status = %response.status(),
                    "Poll attempt failed"
                );
            }
            Err(e) => {
                tracing::debug!(message_id = %message_id, attempt, error = %e, "Poll attempt failed");
            }
        }

        if attempt < options.max_attempts {
            tokio::time::sleep(options.interval).await;
        }
    }

    tracing::debug!(message_id = %message_id, "Poll budget exhausted");
    Ok(None)
}
