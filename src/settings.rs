//! Service configuration.
//!
//! Layered as: built-in defaults, then `config/default.toml` if present, then
//! environment variables prefixed `QUAKE_` with `__` between nested keys
//! (`QUAKE_PORT`, `QUAKE_QUEUE__WORKERS`, `QUAKE_STORE__CLICKHOUSE__URL`).

use std::time::Duration;

use anyhow::{Context, Result};
use clickhouse_store::ClickHouseConfig;
use event_queue::QueueConfig;
use quake_core::limits::DEFAULT_RETENTION_HOURS;
use serde::{Deserialize, Serialize};
use worker::WorkerConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    ClickHouse,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSettings {
    #[serde(default = "default_backend")]
    pub backend: StoreBackend,
    #[serde(default)]
    pub clickhouse: ClickHouseConfig,
}

fn default_backend() -> StoreBackend {
    StoreBackend::ClickHouse
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            clickhouse: ClickHouseConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetentionSettings {
    /// Window applied by `/api/cleanup` without `hours`, and by the periodic sweep
    #[serde(default = "default_window_hours")]
    pub window_hours: u64,
    /// Periodic sweep interval; 0 disables it
    #[serde(default)]
    pub sweep_interval_secs: u64,
}

fn default_window_hours() -> u64 {
    DEFAULT_RETENTION_HOURS
}

impl Default for RetentionSettings {
    fn default() -> Self {
        Self {
            window_hours: default_window_hours(),
            sweep_interval_secs: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchAgentSettings {
    #[serde(default = "default_fetch_url")]
    pub url: String,
    #[serde(default = "default_fetch_timeout")]
    pub timeout_secs: u64,
}

fn default_fetch_url() -> String {
    "http://sensor-agent:5001/trigger-fetch".to_string()
}

fn default_fetch_timeout() -> u64 {
    30
}

impl Default for FetchAgentSettings {
    fn default() -> Self {
        Self {
            url: default_fetch_url(),
            timeout_secs: default_fetch_timeout(),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub queue: QueueConfig,
    #[serde(default)]
    pub retention: RetentionSettings,
    #[serde(default)]
    pub store: StoreSettings,
    #[serde(default)]
    pub fetch_agent: FetchAgentSettings,
    /// Metrics snapshot log interval; 0 disables it
    #[serde(default = "default_metrics_interval")]
    pub metrics_log_interval_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_metrics_interval() -> u64 {
    60
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            queue: QueueConfig::default(),
            retention: RetentionSettings::default(),
            store: StoreSettings::default(),
            fetch_agent: FetchAgentSettings::default(),
            metrics_log_interval_secs: default_metrics_interval(),
        }
    }
}

fn non_zero_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

impl Settings {
    /// Load configuration from files and environment.
    pub fn load() -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Config::try_from(&Settings::default())?)
            .add_source(
                config::File::with_name("config/default")
                    .required(false)
                    .format(config::FileFormat::Toml),
            )
            .add_source(
                config::Environment::with_prefix("QUAKE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_agent.timeout_secs.max(1))
    }

    pub fn worker_config(&self) -> WorkerConfig {
        WorkerConfig {
            retention_interval: non_zero_secs(self.retention.sweep_interval_secs),
            retention_window_hours: self.retention.window_hours,
            metrics_log_interval: non_zero_secs(self.metrics_log_interval_secs),
            ..WorkerConfig::default()
        }
    }
}
