//! Turbine Monitor - wind-farm telemetry poller and monitoring dashboard
//!
//! Polls the farm telemetry endpoint on a fixed interval, merges partial
//! responses over hardcoded defaults, and serves a dashboard plus the JSON
//! boundaries into the session/submission store.

pub mod client;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod poller;
pub mod state;
pub mod telemetry;
pub mod transport;

pub use config::{load_config, Config};
pub use error::{MonitorError, Result};

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use ventosa_store::{new_store_handle, JsonFileRepository, Store};

use crate::client::TelemetryClient;
use crate::poller::TelemetryPoller;
use crate::transport::ReqwestTransport;

/// Run the turbine-monitor service with the given configuration
pub async fn run(config: Config) -> Result<()> {
    let cancel = CancellationToken::new();

    // Build the store with explicit persistence
    let repository = JsonFileRepository::open(&config.store.data_file)?;
    let store = Store::load(
        config.users.clone(),
        Box::new(repository),
        config.store.max_submissions,
        Duration::from_millis(config.store.login_delay_ms),
    );
    let store = new_store_handle(store);

    // Build the poller
    let transport: Arc<dyn transport::SnapshotTransport> = Arc::new(ReqwestTransport::default());
    let telemetry = state::new_telemetry_handle();
    let client = TelemetryClient::new(&config.telemetry, transport);
    let poller = TelemetryPoller::new(
        client,
        Arc::clone(&telemetry),
        Duration::from_secs(config.telemetry.polling_interval_seconds),
    );
    let poller_handle = poller.spawn(cancel.clone());

    // Setup shutdown handler
    let cancel_for_signal = cancel.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to listen for ctrl-c");
        tracing::info!("Shutdown signal received");
        cancel_for_signal.cancel();
    });

    tracing::info!("Turbine monitor started");

    if config.dashboard.enabled {
        let router = dashboard::build_router(store, Arc::clone(&telemetry));
        let addr = SocketAddr::from(([0, 0, 0, 0], config.dashboard.port));
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Dashboard listening on http://{}", addr);

        let cancel_for_dashboard = cancel.clone();
        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                cancel_for_dashboard.cancelled().await;
            })
            .await?;
        tracing::debug!("Dashboard stopped");
    } else {
        cancel.cancelled().await;
    }

    // Tear down the poll loop; no state writes happen after this resolves
    poller_handle.shutdown().await;
    tracing::info!("Turbine monitor stopped");

    Ok(())
}
