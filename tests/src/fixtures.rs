//! Test fixtures: sensor payloads, stored records, and a fake fetch agent.

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use chrono::Utc;
use parking_lot::Mutex;
use quake_core::{Coordinates, EventRecord};
use serde_json::Value;
use std::sync::Arc;
use tokio::task::JoinHandle;
use uuid::Uuid;

/// A valid sensor payload with a unique id.
pub fn sensor_event(magnitude: f64) -> Value {
    serde_json::json!({
        "id": format!("us{}", Uuid::new_v4().simple()),
        "place": "12 km NE of Ridgecrest, CA",
        "magnitude": magnitude,
        "time": Utc::now().timestamp_millis(),
        "coordinates": [-117.6, 35.7, 8.2],
        "tsunami": 0
    })
}

/// N valid sensor payloads.
pub fn sensor_events(n: usize) -> Vec<Value> {
    (0..n).map(|i| sensor_event(1.0 + (i % 5) as f64)).collect()
}

/// A stored record built directly, bypassing the API.
pub fn record(id: &str, place: &str, magnitude: f64, time: i64) -> EventRecord {
    EventRecord {
        id: id.to_string(),
        place: place.to_string(),
        magnitude,
        time,
        coordinates: Some(Coordinates::new(-120.0, 36.0, 10.0)),
        tsunami: 0,
        simulated: false,
    }
}

/// Epoch milliseconds `hours` ago (negative for the future).
pub fn hours_ago(hours: i64) -> i64 {
    Utc::now().timestamp_millis() - hours * 3_600_000
}

#[derive(Clone)]
struct AgentState {
    status: StatusCode,
    body: Value,
    received: Arc<Mutex<Vec<Value>>>,
}

async fn trigger(State(state): State<AgentState>, Json(request): Json<Value>) -> (StatusCode, Json<Value>) {
    state.received.lock().push(request);
    (state.status, Json(state.body.clone()))
}

/// Stand-in for the sensor fetch agent, listening on a random local port.
pub struct FakeAgent {
    pub url: String,
    received: Arc<Mutex<Vec<Value>>>,
    handle: JoinHandle<()>,
}

impl FakeAgent {
    /// Answers every trigger with `status` and `body`.
    pub async fn start(status: StatusCode, body: Value) -> Self {
        let received = Arc::new(Mutex::new(Vec::new()));
        let app = Router::new()
            .route("/trigger-fetch", post(trigger))
            .with_state(AgentState {
                status,
                body,
                received: received.clone(),
            });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake agent");
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Self {
            url: format!("http://{}/trigger-fetch", addr),
            received,
            handle,
        }
    }

    /// Request bodies received so far.
    pub fn received(&self) -> Vec<Value> {
        self.received.lock().clone()
    }
}

impl Drop for FakeAgent {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
