//! Application state shared across handlers.

use event_queue::AdmissionGate;
use quake_core::{Error, EventStore, RetentionPolicy, Result, UpstreamErrorCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Range token sent when the caller does not name one.
pub const DEFAULT_FETCH_RANGE: &str = "hour";

/// Body of a fetch trigger, forwarded to the agent as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchRequest {
    #[serde(default)]
    pub range: String,
}

impl Default for FetchRequest {
    fn default() -> Self {
        Self {
            range: DEFAULT_FETCH_RANGE.to_string(),
        }
    }
}

impl FetchRequest {
    /// Reads a request body. An empty or unreadable body, or an empty range,
    /// falls back to the default range.
    pub fn from_body(body: &[u8]) -> Self {
        let request: Self = serde_json::from_slice(body).unwrap_or_default();
        if request.range.trim().is_empty() {
            Self::default()
        } else {
            request
        }
    }
}

/// What the fetch agent answered.
#[derive(Debug, Clone)]
pub struct AgentReply {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Fetch agent client.
///
/// Posts `{"range": ...}` to the agent's trigger endpoint and hands back its
/// status and body untouched.
#[derive(Clone)]
pub struct FetchAgentClient {
    url: String,
    http_client: reqwest::Client,
}

impl FetchAgentClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            url: url.into(),
            http_client,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Forwards a fetch trigger. Any non-2xx answer is still a reply; only
    /// transport failures are errors.
    pub async fn trigger(&self, request: &FetchRequest) -> Result<AgentReply> {
        debug!(url = %self.url, range = %request.range, "Calling fetch agent");

        let response = self
            .http_client
            .post(&self.url)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                warn!(url = %self.url, error = %e, "Fetch agent request failed");
                Error::upstream(
                    UpstreamErrorCode::Unavailable,
                    format!("Fetch agent unavailable: {}", e),
                )
            })?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(|e| {
            warn!(url = %self.url, error = %e, "Fetch agent response unreadable");
            Error::upstream(
                UpstreamErrorCode::Unavailable,
                format!("Fetch agent response unreadable: {}", e),
            )
        })?;

        Ok(AgentReply {
            status,
            body: body.to_vec(),
        })
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Event store (ClickHouse in production, in-memory in tests)
    pub store: Arc<dyn EventStore>,
    /// Producer side of the ingestion queue
    pub gate: AdmissionGate,
    pub fetch_agent: FetchAgentClient,
    /// Default window for `/api/cleanup` when no `hours` is given
    pub retention: RetentionPolicy,
}

impl AppState {
    pub fn new(
        store: Arc<dyn EventStore>,
        gate: AdmissionGate,
        fetch_agent: FetchAgentClient,
    ) -> Self {
        Self {
            store,
            gate,
            fetch_agent,
            retention: RetentionPolicy::default(),
        }
    }

    pub fn with_retention(mut self, retention: RetentionPolicy) -> Self {
        self.retention = retention;
        self
    }
}
