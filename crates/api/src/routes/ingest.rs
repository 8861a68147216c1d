//! Ingestion endpoint handler.
//!
//! Validates one record and offers it to the admission gate. The response only
//! says whether the record was queued; persistence happens later on a worker
//! and is not tied to this request.

use axum::{body::Bytes, extract::State};
use quake_core::{limits::MAX_PAYLOAD_BYTES, Error, IngestPayload};
use telemetry::metrics;
use tracing::{debug, warn};

use crate::response::{ApiError, IngestResponse};
use crate::state::AppState;

/// POST /api/ingest
pub async fn ingest_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<IngestResponse, ApiError> {
    metrics().events_received.inc();

    let record = parse_record(&body).map_err(|e| {
        metrics().events_failed_validation.inc();
        warn!(payload_size = body.len(), error = %e, "Rejected invalid event");
        ApiError::from(e)
    })?;

    let id = record.id.clone();
    if state.gate.enqueue(record).is_queued() {
        debug!(id = %id, "Event queued");
        Ok(IngestResponse::queued(id))
    } else {
        Ok(IngestResponse::queue_full())
    }
}

fn parse_record(body: &[u8]) -> Result<quake_core::EventRecord, Error> {
    if body.len() > MAX_PAYLOAD_BYTES {
        return Err(Error::out_of_range(format!(
            "Payload size {}KB exceeds {}KB limit",
            body.len() / 1024,
            MAX_PAYLOAD_BYTES / 1024
        )));
    }
    IngestPayload::parse(body)?.into_record()
}
