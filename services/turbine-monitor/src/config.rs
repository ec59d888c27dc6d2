//! Configuration types for the turbine-monitor service

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use ventosa_store::{Role, UserRecord};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub telemetry: TelemetryConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
    #[serde(default)]
    pub store: StoreConfig,
    /// Static credential table. Fixture data, not user-editable at runtime.
    #[serde(default = "default_users")]
    pub users: Vec<UserRecord>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            telemetry: TelemetryConfig::default(),
            dashboard: DashboardConfig::default(),
            store: StoreConfig::default(),
            users: default_users(),
        }
    }
}

/// Telemetry endpoint and polling settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_telemetry_port")]
    pub port: u16,
    #[serde(default = "default_telemetry_path")]
    pub path: String,
    #[serde(default = "default_polling_interval")]
    pub polling_interval_seconds: u64,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_telemetry_port(),
            path: default_telemetry_path(),
            polling_interval_seconds: default_polling_interval(),
        }
    }
}

/// Dashboard configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_dashboard_port")]
    pub port: u16,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            port: default_dashboard_port(),
        }
    }
}

/// Store persistence and behavior settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,
    #[serde(default = "default_max_submissions")]
    pub max_submissions: usize,
    /// Simulated network latency applied to login, in milliseconds
    #[serde(default = "default_login_delay_ms")]
    pub login_delay_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            max_submissions: default_max_submissions(),
            login_delay_ms: default_login_delay_ms(),
        }
    }
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_telemetry_port() -> u16 {
    3000
}

fn default_telemetry_path() -> String {
    "/api/index.json".to_string()
}

fn default_polling_interval() -> u64 {
    5
}

fn default_true() -> bool {
    true
}

fn default_dashboard_port() -> u16 {
    8080
}

fn default_data_file() -> PathBuf {
    PathBuf::from("ventosa-store.json")
}

fn default_max_submissions() -> usize {
    500
}

fn default_login_delay_ms() -> u64 {
    1000
}

fn default_users() -> Vec<UserRecord> {
    vec![
        UserRecord {
            email: "green01@ventosa.energia".to_string(),
            password: "password01".to_string(),
            role: Role::User,
            name: "Green Operator".to_string(),
        },
        UserRecord {
            email: "admin01@ventosa.energia".to_string(),
            password: "password02".to_string(),
            role: Role::Admin,
            name: "Site Admin".to_string(),
        },
    ]
}

/// Load configuration from a JSON file
pub fn load_config(path: &Path) -> crate::Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        crate::MonitorError::Config(format!("Failed to read config file {:?}: {}", path, e))
    })?;
    let config: Config = serde_json::from_str(&content)?;
    Ok(config)
}
