//! Manual fetch trigger, relayed to the sensor fetch agent.

use axum::{
    body::Bytes,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use telemetry::{health, metrics};
use tracing::info;

use crate::response::ApiError;
use crate::state::{AppState, FetchRequest};

/// POST /api/fetch-now - Relays the agent's status and body unchanged.
pub async fn fetch_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let request = FetchRequest::from_body(&body);
    metrics().fetch_triggers.inc();

    let reply = match state.fetch_agent.trigger(&request).await {
        Ok(reply) => {
            health().fetch_agent.set_healthy();
            reply
        }
        Err(e) => {
            health().fetch_agent.set_unhealthy(e.to_string());
            return Err(e.into());
        }
    };

    info!(range = %request.range, status = reply.status, "Fetch agent answered");

    let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::BAD_GATEWAY);
    Ok((status, [(header::CONTENT_TYPE, "application/json")], reply.body).into_response())
}
