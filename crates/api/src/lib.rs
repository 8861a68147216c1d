//! HTTP API layer for the seismic ingestion service.

pub mod export;
pub mod extractors;
pub mod response;
pub mod routes;
pub mod state;

pub use routes::router;
pub use state::{AppState, FetchAgentClient};
