//! Consumer worker: takes records off the bounded queue and upserts them into
//! the event store.
//!
//! Each record is written once. A failed upsert is logged and counted, and the
//! record is dropped; there is no retry and no dead-letter path. A store that
//! panics mid-write counts as a failed upsert and the worker keeps consuming.

use event_queue::BoundedQueue;
use futures::FutureExt;
use quake_core::{Error, EventRecord, EventStore, RiskLevel};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;
use telemetry::metrics;
use tracing::{debug, error, info};

/// One persistence worker. Any number may share the same queue.
pub struct ConsumerWorker {
    id: usize,
    queue: Arc<BoundedQueue>,
    store: Arc<dyn EventStore>,
}

impl ConsumerWorker {
    pub fn new(id: usize, queue: Arc<BoundedQueue>, store: Arc<dyn EventStore>) -> Self {
        Self { id, queue, store }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    /// Runs until the queue is closed and drained. Returns the number of
    /// records this worker persisted.
    pub async fn run(&self) -> u64 {
        debug!(worker = self.id, "Consumer worker starting");
        let mut persisted = 0u64;

        while let Some(record) = self.queue.take().await {
            metrics().queue_depth.set(self.queue.len() as u64);
            if self.process(&record).await {
                persisted += 1;
            }
        }

        debug!(worker = self.id, persisted, "Consumer worker stopped");
        persisted
    }

    /// Upserts one record. Returns whether the write succeeded.
    async fn process(&self, record: &EventRecord) -> bool {
        metrics().active_workers.inc();
        let started = Instant::now();
        let result = AssertUnwindSafe(self.store.upsert(record))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| Err(Error::store(panic_message(panic.as_ref()))));
        metrics()
            .upsert_latency_ms
            .observe(started.elapsed().as_millis() as u64);
        metrics().active_workers.dec();

        match result {
            Ok(()) => {
                metrics().upserts.inc();
                if record.risk() >= RiskLevel::High {
                    info!(
                        worker = self.id,
                        id = %record.id,
                        magnitude = record.magnitude,
                        risk = %record.risk(),
                        place = %record.place,
                        "Stored significant event"
                    );
                } else {
                    debug!(worker = self.id, id = %record.id, "Stored event");
                }
                true
            }
            Err(e) => {
                metrics().upsert_errors.inc();
                error!(
                    worker = self.id,
                    id = %record.id,
                    error = %e,
                    "Failed to store event"
                );
                false
            }
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    let detail = payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string payload");
    format!("store panicked: {}", detail)
}
