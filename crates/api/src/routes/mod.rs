//! API routes.

pub mod cleanup;
pub mod events;
pub mod export;
pub mod fetch;
pub mod health;
pub mod ingest;
pub mod simulate;

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::state::AppState;

/// Creates the API router.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .route("/ingest", post(ingest::ingest_handler))
        .route("/events", get(events::events_handler))
        .route("/cleanup", delete(cleanup::cleanup_handler))
        .route("/simulate", post(simulate::simulate_handler))
        .route("/export", get(export::export_handler))
        .route("/fetch-now", post(fetch::fetch_handler));

    Router::new()
        .nest("/api", api)
        .route("/health", get(health::health_handler))
        .route("/health/ready", get(health::ready_handler))
        .route("/health/live", get(health::live_handler))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
