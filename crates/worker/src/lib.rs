//! Background workers for the seismic ingestion service.
//!
//! - Consumer workers (bounded queue → event store), run as a [`WorkerPool`]
//! - Retention (periodic sweep of aged and synthetic records)
//! - Scheduler (retention and metrics ticks)

pub mod consumer;
pub mod pool;
pub mod retention;
pub mod scheduler;

pub use consumer::*;
pub use pool::*;
pub use retention::RetentionWorker;
pub use scheduler::*;
