//! In-process pipeline metrics.
//!
//! Atomic counters updated on the hot path; the scheduler logs a snapshot on a
//! fixed interval.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// A monotonically increasing counter.
#[derive(Debug, Default)]
pub struct Counter(AtomicU64);

impl Counter {
    pub fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    pub fn inc(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_by(&self, n: u64) {
        self.0.fetch_add(n, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

/// A gauge that moves both ways and never wraps below zero.
#[derive(Debug, Default)]
pub struct Gauge(AtomicU64);

impl Gauge {
    pub fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    pub fn set(&self, val: u64) {
        self.0.store(val, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }

    pub fn inc(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    pub fn dec(&self) {
        let _ = self
            .0
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |v| v.checked_sub(1));
    }
}

/// Latency histogram in milliseconds.
#[derive(Debug)]
pub struct Histogram {
    /// Upper bounds: 1ms, 5ms, 10ms, 50ms, 100ms, 500ms, 1s, 5s, +inf
    buckets: [AtomicU64; 9],
    sum: AtomicU64,
    count: AtomicU64,
}

impl Default for Histogram {
    fn default() -> Self {
        Self::new()
    }
}

impl Histogram {
    const BUCKET_BOUNDS: [u64; 8] = [1, 5, 10, 50, 100, 500, 1000, 5000];

    pub fn new() -> Self {
        Self {
            buckets: Default::default(),
            sum: AtomicU64::new(0),
            count: AtomicU64::new(0),
        }
    }

    pub fn observe(&self, ms: u64) {
        self.sum.fetch_add(ms, Ordering::Relaxed);
        self.count.fetch_add(1, Ordering::Relaxed);

        let idx = Self::BUCKET_BOUNDS
            .iter()
            .position(|&bound| ms <= bound)
            .unwrap_or(Self::BUCKET_BOUNDS.len());
        self.buckets[idx].fetch_add(1, Ordering::Relaxed);
    }

    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    pub fn mean(&self) -> f64 {
        let count = self.count();
        if count == 0 {
            0.0
        } else {
            self.sum.load(Ordering::Relaxed) as f64 / count as f64
        }
    }

    /// Bucket counts keyed by upper bound; `None` is the overflow bucket.
    pub fn buckets(&self) -> Vec<(Option<u64>, u64)> {
        Self::BUCKET_BOUNDS
            .iter()
            .map(|&b| Some(b))
            .chain(std::iter::once(None))
            .zip(self.buckets.iter())
            .map(|(bound, count)| (bound, count.load(Ordering::Relaxed)))
            .collect()
    }
}

/// Metrics for the ingestion pipeline.
#[derive(Debug, Default)]
pub struct Metrics {
    // Admission
    pub events_received: Counter,
    pub events_queued: Counter,
    pub events_rejected: Counter,
    pub events_failed_validation: Counter,

    // Persistence
    pub upserts: Counter,
    pub upsert_errors: Counter,
    pub records_deleted: Counter,
    pub simulations: Counter,
    pub fetch_triggers: Counter,

    // Latency histograms
    pub upsert_latency_ms: Histogram,
    pub query_latency_ms: Histogram,

    // Gauges
    pub queue_depth: Gauge,
    pub active_workers: Gauge,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes a snapshot of current metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            timestamp: Utc::now(),
            events_received: self.events_received.get(),
            events_queued: self.events_queued.get(),
            events_rejected: self.events_rejected.get(),
            events_failed_validation: self.events_failed_validation.get(),
            upserts: self.upserts.get(),
            upsert_errors: self.upsert_errors.get(),
            records_deleted: self.records_deleted.get(),
            simulations: self.simulations.get(),
            fetch_triggers: self.fetch_triggers.get(),
            upsert_latency_mean_ms: self.upsert_latency_ms.mean(),
            query_latency_mean_ms: self.query_latency_ms.mean(),
            queue_depth: self.queue_depth.get(),
            active_workers: self.active_workers.get(),
        }
    }
}

/// A snapshot of metrics at a point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub timestamp: DateTime<Utc>,
    pub events_received: u64,
    pub events_queued: u64,
    pub events_rejected: u64,
    pub events_failed_validation: u64,
    pub upserts: u64,
    pub upsert_errors: u64,
    pub records_deleted: u64,
    pub simulations: u64,
    pub fetch_triggers: u64,
    pub upsert_latency_mean_ms: f64,
    pub query_latency_mean_ms: f64,
    pub queue_depth: u64,
    pub active_workers: u64,
}

impl MetricsSnapshot {
    /// Emits the snapshot as one structured log line.
    pub fn log(&self) {
        tracing::info!(
            events_received = self.events_received,
            events_queued = self.events_queued,
            events_rejected = self.events_rejected,
            events_failed_validation = self.events_failed_validation,
            upserts = self.upserts,
            upsert_errors = self.upsert_errors,
            records_deleted = self.records_deleted,
            simulations = self.simulations,
            fetch_triggers = self.fetch_triggers,
            upsert_latency_mean_ms = self.upsert_latency_mean_ms,
            query_latency_mean_ms = self.query_latency_mean_ms,
            queue_depth = self.queue_depth,
            active_workers = self.active_workers,
            "Pipeline metrics"
        );
    }
}

/// Global metrics registry.
pub static METRICS: std::sync::LazyLock<Metrics> = std::sync::LazyLock::new(Metrics::new);

/// Get the global metrics instance.
pub fn metrics() -> &'static Metrics {
    &METRICS
}
