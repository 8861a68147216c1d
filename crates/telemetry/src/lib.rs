//! Internal telemetry for the seismic ingestion service.
//!
//! Metrics are kept in-process and logged periodically by the worker
//! scheduler; no external metrics system is involved.

pub mod health;
pub mod metrics;
pub mod tracing_setup;

pub use health::*;
pub use metrics::*;
pub use tracing_setup::*;
