//! Client for the telemetry snapshot endpoint

use std::sync::Arc;

use crate::config::TelemetryConfig;
use crate::telemetry::TelemetryUpdate;
use crate::transport::SnapshotTransport;

/// Fetches partial telemetry snapshots from the monitoring endpoint
pub struct TelemetryClient {
    url: String,
    transport: Arc<dyn SnapshotTransport>,
}

impl std::fmt::Debug for TelemetryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelemetryClient")
            .field("url", &self.url)
            .finish()
    }
}

impl TelemetryClient {
    pub fn new(config: &TelemetryConfig, transport: Arc<dyn SnapshotTransport>) -> Self {
        let url = format!("http://{}:{}{}", config.host, config.port, config.path);
        tracing::debug!("Created TelemetryClient for {}", url);
        Self { url, transport }
    }

    /// Fetch one partial snapshot. Transport errors, non-2xx statuses and
    /// unparsable bodies are all fetch failures.
    pub async fn fetch(&self) -> crate::Result<TelemetryUpdate> {
        let reply = self
            .transport
            .fetch_document(&self.url)
            .await
            .map_err(|e| crate::MonitorError::Fetch(e.to_string()))?;

        if !reply.is_success() {
            return Err(crate::MonitorError::Fetch(format!(
                "Telemetry endpoint returned status {}",
                reply.status
            )));
        }

        serde_json::from_str(&reply.body).map_err(|e| {
            crate::MonitorError::Fetch(format!("Unparsable telemetry response: {}", e))
        })
    }
}
