//! Worker scheduler for periodic background tasks.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info};

use quake_core::{EventStore, RetentionPolicy};
use telemetry::{health, metrics};

use crate::retention::RetentionWorker;

/// Worker scheduler configuration.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Automatic retention sweep interval. `None` leaves cleanup to the HTTP endpoint.
    pub retention_interval: Option<Duration>,
    /// Window used by the automatic sweep
    pub retention_window_hours: u64,
    /// Metrics snapshot logging interval. `None` disables it.
    pub metrics_log_interval: Option<Duration>,
    /// Store ping interval for the health registry
    pub health_check_interval: Duration,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            retention_interval: None,
            retention_window_hours: quake_core::limits::DEFAULT_RETENTION_HOURS,
            metrics_log_interval: Some(Duration::from_secs(60)),
            health_check_interval: Duration::from_secs(30),
        }
    }
}

/// Background task scheduler.
pub struct WorkerScheduler {
    config: WorkerConfig,
    store: Arc<dyn EventStore>,
}

impl WorkerScheduler {
    pub fn new(config: WorkerConfig, store: Arc<dyn EventStore>) -> Self {
        Self { config, store }
    }

    /// Starts all enabled background tasks. The tasks run until aborted.
    pub fn start(self: Arc<Self>) -> Vec<tokio::task::JoinHandle<()>> {
        let mut handles = Vec::new();

        if let Some(period) = self.config.retention_interval {
            let scheduler = self.clone();
            handles.push(tokio::spawn(async move {
                scheduler.run_retention(period).await;
            }));
            info!(
                interval_secs = period.as_secs(),
                window_hours = self.config.retention_window_hours,
                "Retention sweep scheduled"
            );
        }

        if let Some(period) = self.config.metrics_log_interval {
            handles.push(tokio::spawn(async move {
                run_metrics_log(period).await;
            }));
        }

        let scheduler = self.clone();
        handles.push(tokio::spawn(async move {
            scheduler.run_health_check().await;
        }));

        info!(tasks = handles.len(), "Background tasks started");
        handles
    }

    async fn run_retention(&self, period: Duration) {
        let worker = RetentionWorker::new(
            self.store.clone(),
            RetentionPolicy::with_window_hours(self.config.retention_window_hours),
        );
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // First tick fires immediately; skip it so startup does not sweep.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            // Failures are logged by the worker.
            let _ = worker.run().await;
        }
    }

    async fn run_health_check(&self) {
        let mut ticker = interval(self.config.health_check_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            match self.store.ping().await {
                Ok(()) => health().store.set_healthy(),
                Err(e) => {
                    error!(backend = self.store.backend(), error = %e, "Store health check failed");
                    health().store.set_unhealthy(e.to_string());
                }
            }
        }
    }
}

async fn run_metrics_log(period: Duration) {
    let mut ticker = interval(period);
    ticker.tick().await;

    loop {
        ticker.tick().await;
        metrics().snapshot().log();
    }
}
