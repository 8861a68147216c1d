//! Manual retention sweep.

use axum::{extract::State, Json};
use quake_core::RetentionPolicy;
use worker::RetentionWorker;

use crate::extractors::CleanupQuery;
use crate::response::{ApiError, CleanupResponse};
use crate::state::AppState;

/// DELETE /api/cleanup?hours=N
pub async fn cleanup_handler(
    State(state): State<AppState>,
    query: CleanupQuery,
) -> Result<Json<CleanupResponse>, ApiError> {
    let policy = query
        .hours
        .map(RetentionPolicy::with_window_hours)
        .unwrap_or(state.retention);

    let outcome = RetentionWorker::new(state.store.clone(), policy).run().await?;

    Ok(Json(CleanupResponse {
        message: outcome.summary(),
        deleted_count: outcome.deleted,
    }))
}
