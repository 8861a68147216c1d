//! CSV export endpoint.

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use tracing::{debug, error};

use crate::export::{render_csv, EXPORT_FILENAME};
use crate::response::ApiError;
use crate::state::AppState;

/// GET /api/export - Every stored record, newest first, as CSV.
pub async fn export_handler(State(state): State<AppState>) -> Result<Response, ApiError> {
    let records = state.store.get_all().await.map_err(|e| {
        error!(error = %e, "Export query failed");
        ApiError::from(e)
    })?;

    let body = render_csv(&records)?;
    debug!(rows = records.len(), bytes = body.len(), "Rendered export");

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={}", EXPORT_FILENAME),
            ),
        ],
        body,
    )
        .into_response())
}
