//! Non-blocking admission in front of the bounded queue.

use quake_core::EventRecord;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use telemetry::metrics;
use tracing::{debug, warn};

use crate::queue::{BoundedQueue, PushError};

/// Outcome reported to the caller. The caller owns any retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Admission {
    Queued,
    Rejected,
}

impl Admission {
    pub fn is_queued(&self) -> bool {
        matches!(self, Self::Queued)
    }
}

/// Producer side of the pipeline. Cheap to clone; all clones share one queue.
#[derive(Clone)]
pub struct AdmissionGate {
    queue: Arc<BoundedQueue>,
}

impl AdmissionGate {
    pub fn new(queue: Arc<BoundedQueue>) -> Self {
        Self { queue }
    }

    /// Attempts an immediate insert. Never waits.
    pub fn enqueue(&self, record: EventRecord) -> Admission {
        match self.queue.try_push(record) {
            Ok(()) => {
                metrics().events_queued.inc();
                metrics().queue_depth.set(self.queue.len() as u64);
                Admission::Queued
            }
            Err(PushError::Full(record)) => {
                metrics().events_rejected.inc();
                debug!(
                    id = %record.id,
                    capacity = self.queue.capacity(),
                    "Queue full, rejecting event"
                );
                Admission::Rejected
            }
            Err(PushError::Closed(record)) => {
                metrics().events_rejected.inc();
                warn!(id = %record.id, "Queue closed, rejecting event");
                Admission::Rejected
            }
        }
    }

    pub fn queue(&self) -> &Arc<BoundedQueue> {
        &self.queue
    }
}
