//! In-memory event store.
//!
//! Backs unit and integration tests, and can serve as a dev backend when no
//! ClickHouse is available. Replace-by-id happens under a single write lock, so
//! concurrent upserts on one id resolve to whichever lock holder came last.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;

use crate::error::Result;
use crate::events::EventRecord;
use crate::store::{DeletePredicate, EventFilter, EventStore};

#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<String, EventRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    pub fn get(&self, id: &str) -> Option<EventRecord> {
        self.records.read().get(id).cloned()
    }
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn upsert(&self, record: &EventRecord) -> Result<()> {
        self.records
            .write()
            .insert(record.id.clone(), record.clone());
        Ok(())
    }

    async fn query(&self, filter: &EventFilter, limit: usize) -> Result<Vec<EventRecord>> {
        let mut matches: Vec<EventRecord> = self
            .records
            .read()
            .values()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();

        matches.sort_by(|a, b| b.time.cmp(&a.time).then_with(|| a.id.cmp(&b.id)));
        if limit > 0 {
            matches.truncate(limit);
        }
        Ok(matches)
    }

    async fn delete_where(&self, predicate: &DeletePredicate) -> Result<u64> {
        if predicate.is_empty() {
            return Ok(0);
        }
        let mut records = self.records.write();
        let before = records.len();
        records.retain(|_, r| !predicate.matches(r));
        Ok((before - records.len()) as u64)
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
