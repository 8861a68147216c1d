//! Retention policy.
//!
//! A sweep removes every record older than `now - window`, plus every synthetic
//! record regardless of age (flagged simulated, or carrying the reserved id prefix).

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::limits::{DEFAULT_RETENTION_HOURS, SIMULATED_ID_PREFIX};
use crate::store::{DeletePredicate, EventStore};

/// Retention policy configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetentionPolicy {
    /// Records older than this many hours are swept. Zero sweeps everything before now.
    pub window_hours: u64,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self {
            window_hours: DEFAULT_RETENTION_HOURS,
        }
    }
}

/// Result of one sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetentionOutcome {
    pub deleted: u64,
    /// Epoch milliseconds
    pub cutoff: i64,
    pub window_hours: u64,
}

impl RetentionOutcome {
    pub fn summary(&self) -> String {
        format!(
            "Cleanup removed {} events (older than {} hours, plus simulated).",
            self.deleted, self.window_hours
        )
    }
}

impl RetentionPolicy {
    pub fn with_window_hours(window_hours: u64) -> Self {
        Self { window_hours }
    }

    /// Epoch-ms cutoff; records strictly older are eligible.
    pub fn cutoff(&self, now: DateTime<Utc>) -> i64 {
        let hours = i64::try_from(self.window_hours).unwrap_or(i64::MAX);
        let window = Duration::try_hours(hours).unwrap_or(Duration::MAX);
        now.checked_sub_signed(window)
            .map(|t| t.timestamp_millis())
            .unwrap_or(i64::MIN)
    }

    pub fn predicate(&self, now: DateTime<Utc>) -> DeletePredicate {
        DeletePredicate {
            before: Some(self.cutoff(now)),
            simulated: true,
            id_prefix: Some(SIMULATED_ID_PREFIX.to_string()),
        }
    }

    /// Runs one sweep against `store`.
    pub async fn apply(&self, store: &dyn EventStore, now: DateTime<Utc>) -> Result<RetentionOutcome> {
        let predicate = self.predicate(now);
        let deleted = store.delete_where(&predicate).await?;
        Ok(RetentionOutcome {
            deleted,
            cutoff: predicate.before.unwrap_or_default(),
            window_hours: self.window_hours,
        })
    }
}
