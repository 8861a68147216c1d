//! Health check endpoints.

use axum::{extract::State, http::StatusCode, Json};
use telemetry::{health, HealthStatus};
use tracing::warn;

use crate::response::HealthResponse;
use crate::state::AppState;

/// Pings the store and records the result in the health registry.
async fn ping_store(state: &AppState) -> bool {
    match state.store.ping().await {
        Ok(()) => {
            health().store.set_healthy();
            true
        }
        Err(e) => {
            warn!(backend = state.store.backend(), error = %e, "Store ping failed");
            health().store.set_unhealthy(e.to_string());
            false
        }
    }
}

fn status_label(status: HealthStatus) -> &'static str {
    match status {
        HealthStatus::Healthy => "healthy",
        HealthStatus::Degraded => "degraded",
        HealthStatus::Unhealthy => "unhealthy",
    }
}

/// GET /health - Full health check.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let store_connected = ping_store(&state).await;
    let report = health().report();
    let queue = state.gate.queue();

    Json(HealthResponse {
        status: status_label(report.status).to_string(),
        store_backend: state.store.backend().to_string(),
        store_connected,
        fetch_agent_reachable: health().fetch_agent.is_healthy(),
        queue_depth: queue.len(),
        queue_capacity: queue.capacity(),
    })
}

/// GET /health/ready - Readiness check (can accept traffic).
pub async fn ready_handler(State(state): State<AppState>) -> StatusCode {
    if ping_store(&state).await && !state.gate.queue().is_closed() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// GET /health/live - Liveness check (service is running).
pub async fn live_handler() -> StatusCode {
    if health().is_alive() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}
