//! Shared telemetry state between the poller and the dashboard

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;

use crate::telemetry::TelemetrySnapshot;

/// Best-effort current telemetry, plus an error banner and a loading flag
/// that is true only before the first poll resolution.
#[derive(Debug, Clone, Serialize)]
pub struct TelemetryState {
    pub snapshot: Option<TelemetrySnapshot>,
    pub error: Option<String>,
    pub loading: bool,
}

impl TelemetryState {
    pub fn new() -> Self {
        Self {
            snapshot: None,
            error: None,
            loading: true,
        }
    }

    /// Store a merged snapshot from a successful fetch and clear any error
    pub fn record_success(&mut self, snapshot: TelemetrySnapshot) {
        self.snapshot = Some(snapshot);
        self.error = None;
        self.loading = false;
    }

    /// Replace the snapshot wholesale with the blackout fallback and keep a
    /// descriptive error message for the banner
    pub fn record_failure(&mut self, message: String) {
        self.snapshot = Some(TelemetrySnapshot::blackout_fallback());
        self.error = Some(message);
        self.loading = false;
    }
}

impl Default for TelemetryState {
    fn default() -> Self {
        Self::new()
    }
}

/// Thread-safe telemetry state handle
pub type TelemetryHandle = Arc<RwLock<TelemetryState>>;

pub fn new_telemetry_handle() -> TelemetryHandle {
    Arc::new(RwLock::new(TelemetryState::new()))
}
