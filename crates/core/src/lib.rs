//! Core types, validation, store contract and retention policy for the
//! seismic ingestion service.

pub mod error;
pub mod events;
pub mod limits;
pub mod memory;
pub mod retention;
pub mod risk;
pub mod simulate;
pub mod store;

pub use error::*;
pub use events::*;
pub use memory::MemoryStore;
pub use retention::*;
pub use risk::RiskLevel;
pub use store::*;
