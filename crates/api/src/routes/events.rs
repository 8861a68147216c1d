//! Event query endpoint.

use axum::{extract::State, Json};
use quake_core::EventRecord;
use std::time::Instant;
use telemetry::metrics;
use tracing::{debug, error};

use crate::extractors::EventsQuery;
use crate::response::ApiError;
use crate::state::AppState;

/// GET /api/events - Matching records, newest first.
pub async fn events_handler(
    State(state): State<AppState>,
    query: EventsQuery,
) -> Result<Json<Vec<EventRecord>>, ApiError> {
    let start = Instant::now();

    let records = state
        .store
        .query(&query.filter, query.limit)
        .await
        .map_err(|e| {
            error!(error = %e, "Event query failed");
            ApiError::from(e)
        })?;

    let latency_ms = start.elapsed().as_millis() as u64;
    metrics().query_latency_ms.observe(latency_ms);
    debug!(
        returned = records.len(),
        limit = query.limit,
        latency_ms,
        "Served event query"
    );

    Ok(Json(records))
}
