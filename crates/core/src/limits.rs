//! Limits and defaults for the ingestion service.
//!
//! The `#[validate]` derive macro requires literal values in attributes,
//! so the payload bounds are duplicated in `events.rs`. Keep both in sync.

// === Pipeline Defaults ===

/// Default admission queue capacity.
pub const DEFAULT_QUEUE_CAPACITY: usize = 100;

/// Default number of persistence workers.
pub const DEFAULT_WORKER_COUNT: usize = 10;

/// Default retention window in hours.
pub const DEFAULT_RETENTION_HOURS: u64 = 1;

// === Payload Bounds ===

/// Maximum ingest body size in bytes (64KB). A single record is well under 1KB.
pub const MAX_PAYLOAD_BYTES: usize = 64 * 1024;

/// Event id max length.
pub const MAX_ID_LEN: usize = 256;

/// Place description max length (chars).
pub const MAX_PLACE_LEN: usize = 512;

/// Lowest magnitude accepted (micro-quakes go slightly negative).
pub const MIN_MAGNITUDE: f64 = -2.0;

/// Highest magnitude accepted.
pub const MAX_MAGNITUDE: f64 = 10.0;

// === Identity ===

/// Reserved id prefix for synthetic records. Retention always removes them.
pub const SIMULATED_ID_PREFIX: &str = "sim_";

/// Prefix for ids synthesized when an external record arrives without one.
pub const GENERATED_ID_PREFIX: &str = "evt_";
