//! Telemetry poll loop
//!
//! One fetch immediately on spawn, then a fixed interval until cancelled.
//! Failures never stop the loop; they install the blackout fallback snapshot
//! and a banner message instead.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::client::TelemetryClient;
use crate::state::TelemetryHandle;
use crate::telemetry::TelemetrySnapshot;

/// Periodically fetches telemetry and publishes it to a shared state handle
pub struct TelemetryPoller {
    client: TelemetryClient,
    state: TelemetryHandle,
    interval: Duration,
}

impl TelemetryPoller {
    pub fn new(client: TelemetryClient, state: TelemetryHandle, interval: Duration) -> Self {
        Self {
            client,
            state,
            interval,
        }
    }

    /// Start the poll loop on a background task. The returned handle owns
    /// the task; once its `shutdown` resolves no further state writes occur.
    pub fn spawn(self, cancel: CancellationToken) -> PollerHandle {
        let task_cancel = cancel.clone();
        let task = tokio::spawn(async move {
            self.run(task_cancel).await;
        });
        PollerHandle { cancel, task }
    }

    async fn run(self, cancel: CancellationToken) {
        loop {
            match self.client.fetch().await {
                Ok(update) => {
                    let merged = TelemetrySnapshot::baseline().merged(update);
                    self.state.write().await.record_success(merged);
                    tracing::debug!("Telemetry poll succeeded");
                }
                Err(e) => {
                    tracing::warn!("Telemetry poll failed: {}", e);
                    self.state
                        .write()
                        .await
                        .record_failure(format!("Failed to fetch monitoring data: {}", e));
                }
            }

            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = cancel.cancelled() => {
                    tracing::debug!("Telemetry poll loop cancelled");
                    break;
                }
            }
        }
    }
}

/// Handle to a running poll loop
pub struct PollerHandle {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl PollerHandle {
    /// Cancel the loop and wait for the task to finish. A fetch already in
    /// flight completes its cycle first, so after this returns the shared
    /// state is no longer written to.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        let _ = self.task.await;
    }
}
