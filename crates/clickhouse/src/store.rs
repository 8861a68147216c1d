//! [`EventStore`] over ClickHouse.

use async_trait::async_trait;
use chrono::Utc;
use clickhouse::query::Query;
use clickhouse::Row;
use quake_core::{Coordinates, DeletePredicate, Error, EventFilter, EventRecord, EventStore, Result};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, warn};

use crate::client::ClickHouseClient;
use crate::schema::EVENTS_TABLE;

/// Ids per `ALTER TABLE ... DELETE` mutation.
const DELETE_CHUNK: usize = 1000;

/// Row layout of `seismic_events`.
#[derive(Debug, Clone, Row, Serialize, Deserialize)]
pub struct EventRow {
    pub id: String,
    pub place: String,
    pub magnitude: f64,
    pub time: i64,
    pub coordinates: Vec<f64>,
    pub tsunami: u32,
    pub is_simulated: bool,
    pub version: u64,
}

#[derive(Debug, Row, Deserialize)]
struct IdRow {
    id: String,
}

impl EventRow {
    pub fn from_record(record: &EventRecord, version: u64) -> Self {
        Self {
            id: record.id.clone(),
            place: record.place.clone(),
            magnitude: record.magnitude,
            time: record.time,
            coordinates: record
                .coordinates
                .map(|c| <[f64; 3]>::from(c).to_vec())
                .unwrap_or_default(),
            tsunami: record.tsunami,
            is_simulated: record.simulated,
            version,
        }
    }
}

impl From<EventRow> for EventRecord {
    fn from(row: EventRow) -> Self {
        let coordinates = if row.coordinates.is_empty() {
            None
        } else {
            match Coordinates::from_components(&row.coordinates) {
                Ok(c) => Some(c),
                Err(e) => {
                    warn!(id = %row.id, error = %e, "Dropping malformed stored coordinates");
                    None
                }
            }
        };

        EventRecord {
            id: row.id,
            place: row.place,
            magnitude: row.magnitude,
            time: row.time,
            coordinates,
            tsunami: row.tsunami,
            simulated: row.is_simulated,
        }
    }
}

/// WHERE clause for a delete predicate. Placeholders are bound by [`bind_predicate`]
/// in the same order.
pub fn predicate_clause(predicate: &DeletePredicate) -> Option<String> {
    let mut terms = Vec::new();
    if predicate.before.is_some() {
        terms.push("time < ?");
    }
    if predicate.simulated {
        terms.push("is_simulated = true");
    }
    if predicate.id_prefix.is_some() {
        terms.push("startsWith(id, ?)");
    }

    if terms.is_empty() {
        None
    } else {
        Some(terms.join(" OR "))
    }
}

fn bind_predicate(mut query: Query, predicate: &DeletePredicate) -> Query {
    if let Some(cutoff) = predicate.before {
        query = query.bind(cutoff);
    }
    if let Some(prefix) = &predicate.id_prefix {
        query = query.bind(prefix.as_str());
    }
    query
}

/// SELECT statement for a read filter.
pub fn filter_sql(filter: &EventFilter, limit: usize) -> String {
    let mut sql = format!("SELECT ?fields FROM {} FINAL WHERE 1", EVENTS_TABLE);
    if filter.min_magnitude.is_some() {
        sql.push_str(" AND magnitude >= ?");
    }
    if filter.place_contains.is_some() {
        sql.push_str(" AND positionCaseInsensitiveUTF8(place, ?) > 0");
    }
    sql.push_str(" ORDER BY time DESC, id ASC");
    if limit > 0 {
        sql.push_str(" LIMIT ?");
    }
    sql
}

pub struct ClickHouseStore {
    client: ClickHouseClient,
    version: AtomicU64,
    timeout: Duration,
}

impl ClickHouseStore {
    pub fn new(client: ClickHouseClient) -> Self {
        let timeout = Duration::from_secs(client.config().timeout_secs.max(1));
        Self {
            client,
            version: AtomicU64::new(0),
            timeout,
        }
    }

    pub fn client(&self) -> &ClickHouseClient {
        &self.client
    }

    /// Strictly increasing per process, and tracks wall-clock nanos so versions
    /// from different processes interleave by write time.
    fn next_version(&self) -> u64 {
        let now = Utc::now()
            .timestamp_nanos_opt()
            .and_then(|n| u64::try_from(n).ok())
            .unwrap_or_default();
        let prev = self
            .version
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |v| {
                Some(now.max(v.saturating_add(1)))
            })
            .unwrap_or_else(|v| v);
        now.max(prev.saturating_add(1))
    }

    async fn bounded<T, F>(&self, op: &'static str, fut: F) -> Result<T>
    where
        F: Future<Output = std::result::Result<T, clickhouse::error::Error>>,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(Error::store(format!("ClickHouse {} failed: {}", op, e))),
            Err(_) => Err(Error::store(format!(
                "ClickHouse {} timed out after {:?}",
                op, self.timeout
            ))),
        }
    }

    async fn write_row(&self, row: &EventRow) -> std::result::Result<(), clickhouse::error::Error> {
        let mut insert = self.client.inner().insert::<EventRow>(EVENTS_TABLE)?;
        insert.write(row).await?;
        insert.end().await
    }
}

#[async_trait]
impl EventStore for ClickHouseStore {
    async fn upsert(&self, record: &EventRecord) -> Result<()> {
        let row = EventRow::from_record(record, self.next_version());
        self.bounded("upsert", self.write_row(&row)).await?;
        debug!(id = %record.id, version = row.version, "Upserted event");
        Ok(())
    }

    async fn query(&self, filter: &EventFilter, limit: usize) -> Result<Vec<EventRecord>> {
        let sql = filter_sql(filter, limit);
        let mut query = self.client.inner().query(&sql);
        if let Some(min) = filter.min_magnitude {
            query = query.bind(min);
        }
        if let Some(place) = &filter.place_contains {
            query = query.bind(place.as_str());
        }
        if limit > 0 {
            query = query.bind(limit as u64);
        }

        let rows: Vec<EventRow> = self.bounded("query", query.fetch_all()).await?;
        Ok(rows.into_iter().map(EventRecord::from).collect())
    }

    async fn delete_where(&self, predicate: &DeletePredicate) -> Result<u64> {
        let Some(clause) = predicate_clause(predicate) else {
            return Ok(0);
        };

        // Resolve ids against the FINAL view, then delete every version of
        // those ids, so an older row can never resurface after the newest is removed.
        let select = format!("SELECT id FROM {} FINAL WHERE {}", EVENTS_TABLE, clause);
        let query = bind_predicate(self.client.inner().query(&select), predicate);
        let rows: Vec<IdRow> = self.bounded("delete scan", query.fetch_all()).await?;
        let ids: Vec<String> = rows.into_iter().map(|r| r.id).collect();

        let delete = format!("ALTER TABLE {} DELETE WHERE has(?, id)", EVENTS_TABLE);
        for chunk in ids.chunks(DELETE_CHUNK) {
            let query = self.client.inner().query(&delete).bind(chunk.to_vec());
            self.bounded("delete", query.execute()).await?;
        }

        debug!(deleted = ids.len(), "Deleted events");
        Ok(ids.len() as u64)
    }

    async fn ping(&self) -> Result<()> {
        let query = self.client.inner().query("SELECT 1");
        self.bounded("ping", query.fetch_one::<u8>()).await.map(|_| ())
    }

    fn backend(&self) -> &'static str {
        "clickhouse"
    }
}
