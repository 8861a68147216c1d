//! Synthetic event generation.

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use quake_core::{simulate::synthetic_event, EventRecord};
use telemetry::metrics;
use tracing::{error, info};

use crate::response::ApiError;
use crate::state::AppState;

/// POST /api/simulate - Writes one synthetic record straight to the store.
pub async fn simulate_handler(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<EventRecord>), ApiError> {
    let record = {
        let mut rng = rand::rng();
        synthetic_event(&mut rng, Utc::now())
    };

    state.store.upsert(&record).await.map_err(|e| {
        error!(id = %record.id, error = %e, "Failed to store simulated event");
        ApiError::from(e)
    })?;

    metrics().simulations.inc();
    info!(
        id = %record.id,
        magnitude = record.magnitude,
        place = %record.place,
        "Simulated event stored"
    );

    Ok((StatusCode::CREATED, Json(record)))
}
