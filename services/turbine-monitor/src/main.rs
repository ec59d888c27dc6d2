//! Turbine Monitor CLI
//!
//! Command-line interface for the wind-farm monitoring service.

use std::path::PathBuf;

use clap::Parser;
use tracing::Level;
use turbine_monitor::{load_config, Config};

#[derive(Parser)]
#[command(name = "turbine-monitor")]
#[command(about = "Wind-farm telemetry poller and monitoring dashboard")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Dashboard port (overrides config file)
    #[arg(long)]
    dashboard_port: Option<u16>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: Level,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .init();

    tracing::debug!(
        "Parsed command line arguments: config={:?}, dashboard_port={:?}, log_level={:?}",
        args.config,
        args.dashboard_port,
        args.log_level
    );

    let mut config = if let Some(config_path) = &args.config {
        tracing::debug!("Loading configuration from {:?}", config_path);
        load_config(config_path)?
    } else {
        tracing::debug!("Using default configuration");
        Config::default()
    };

    if let Some(dashboard_port) = args.dashboard_port {
        config.dashboard.port = dashboard_port;
    }

    tracing::info!("Starting turbine-monitor service");
    tracing::debug!(
        "Telemetry endpoint: http://{}:{}{} every {}s",
        config.telemetry.host,
        config.telemetry.port,
        config.telemetry.path,
        config.telemetry.polling_interval_seconds
    );

    turbine_monitor::run(config).await?;

    Ok(())
}
