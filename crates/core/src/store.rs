//! Event store contract.
//!
//! The pipeline only talks to storage through [`EventStore`]. Implementations
//! must make `upsert` atomic per id and be safe to call from many tasks at once;
//! callers add no locking of their own.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::events::EventRecord;

/// Read filter for [`EventStore::query`]. The default filter matches every
/// record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventFilter {
    /// Inclusive lower bound on magnitude
    pub min_magnitude: Option<f64>,
    /// Case-insensitive substring of `place`
    pub place_contains: Option<String>,
}

impl EventFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_min_magnitude(mut self, min_magnitude: f64) -> Self {
        self.min_magnitude = Some(min_magnitude);
        self
    }

    pub fn with_place(mut self, place: impl Into<String>) -> Self {
        self.place_contains = Some(place.into());
        self
    }

    pub fn matches(&self, record: &EventRecord) -> bool {
        if self.min_magnitude.is_some_and(|min| record.magnitude < min) {
            return false;
        }
        match &self.place_contains {
            Some(needle) => record
                .place
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            None => true,
        }
    }
}

/// Disjunctive delete predicate: a record matches if ANY set term matches.
/// A predicate with no terms matches nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeletePredicate {
    /// Matches records with `time` strictly before this epoch-ms cutoff
    pub before: Option<i64>,
    /// Matches records flagged as simulated
    pub simulated: bool,
    /// Matches records whose id starts with this prefix
    pub id_prefix: Option<String>,
}

impl DeletePredicate {
    pub fn is_empty(&self) -> bool {
        self.before.is_none() && !self.simulated && self.id_prefix.is_none()
    }

    pub fn matches(&self, record: &EventRecord) -> bool {
        self.before.is_some_and(|cutoff| record.time < cutoff)
            || (self.simulated && record.simulated)
            || self
                .id_prefix
                .as_deref()
                .is_some_and(|prefix| record.id.starts_with(prefix))
    }
}

/// Storage capability used by the worker pool and the read paths.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Create or fully replace the record with `record.id`.
    async fn upsert(&self, record: &EventRecord) -> Result<()>;

    /// Matching records sorted by `time` descending. `limit == 0` means unbounded.
    async fn query(&self, filter: &EventFilter, limit: usize) -> Result<Vec<EventRecord>>;

    /// Remove every matching record, returning how many were removed.
    async fn delete_where(&self, predicate: &DeletePredicate) -> Result<u64>;

    async fn get_all(&self) -> Result<Vec<EventRecord>> {
        self.query(&EventFilter::default(), 0).await
    }

    /// Connectivity check for health reporting.
    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    /// Short backend name for logs and health output.
    fn backend(&self) -> &'static str;
}
