//! Retention worker.
//!
//! Applies a [`RetentionPolicy`] to the event store: drops records older than the
//! window and every synthetic record. The HTTP cleanup endpoint and the periodic
//! sweep both go through here.

use chrono::{DateTime, Utc};
use quake_core::{EventStore, Result, RetentionOutcome, RetentionPolicy};
use std::sync::Arc;
use telemetry::metrics;
use tracing::{debug, error, info};

pub struct RetentionWorker {
    store: Arc<dyn EventStore>,
    policy: RetentionPolicy,
}

impl RetentionWorker {
    pub fn new(store: Arc<dyn EventStore>, policy: RetentionPolicy) -> Self {
        Self { store, policy }
    }

    pub fn policy(&self) -> RetentionPolicy {
        self.policy
    }

    /// Runs one sweep at the current time.
    pub async fn run(&self) -> Result<RetentionOutcome> {
        self.run_at(Utc::now()).await
    }

    /// Runs one sweep as of `now`.
    pub async fn run_at(&self, now: DateTime<Utc>) -> Result<RetentionOutcome> {
        debug!(
            window_hours = self.policy.window_hours,
            backend = self.store.backend(),
            "Running retention sweep"
        );

        match self.policy.apply(self.store.as_ref(), now).await {
            Ok(outcome) => {
                metrics().records_deleted.inc_by(outcome.deleted);
                if outcome.deleted > 0 {
                    info!(
                        deleted = outcome.deleted,
                        cutoff_ms = outcome.cutoff,
                        window_hours = outcome.window_hours,
                        "Retention sweep complete"
                    );
                }
                Ok(outcome)
            }
            Err(e) => {
                error!(
                    window_hours = self.policy.window_hours,
                    error = %e,
                    "Retention sweep failed"
                );
                Err(e)
            }
        }
    }
}
