//! ClickHouse event store adapter for the seismic ingestion service.

pub mod client;
pub mod config;
pub mod health;
pub mod schema;
pub mod store;

pub use client::*;
pub use config::*;
pub use store::ClickHouseStore;
