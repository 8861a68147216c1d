//! Bounded admission queue for the seismic ingestion service.
//!
//! Producers go through [`AdmissionGate`], which never waits; consumers
//! (the worker pool) block on [`BoundedQueue::take`].

pub mod admission;
pub mod config;
pub mod queue;

pub use admission::*;
pub use config::*;
pub use queue::*;
