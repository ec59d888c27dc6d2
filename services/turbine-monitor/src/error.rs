//! Error types for the turbine-monitor service

/// Errors that can occur in the turbine-monitor service
#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Telemetry fetch failed: {0}")]
    Fetch(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Store(#[from] ventosa_store::StoreError),
}

/// Result type alias for turbine-monitor operations
pub type Result<T> = std::result::Result<T, MonitorError>;
