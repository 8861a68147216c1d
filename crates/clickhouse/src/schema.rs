//! ClickHouse table schema.
//!
//! `seismic_events` is a ReplacingMergeTree keyed by `id`: every upsert appends
//! a row with a higher `version`, and reads with `FINAL` see only the newest
//! row per id. That gives replace-by-id without read-modify-write.

/// Events table name (unqualified; the client carries the database).
pub const EVENTS_TABLE: &str = "seismic_events";

pub fn create_database(database: &str) -> String {
    format!("CREATE DATABASE IF NOT EXISTS {}", database)
}

/// SQL for creating the events table.
pub const CREATE_EVENTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS seismic_events (
    id String,
    place String,
    magnitude Float64,
    -- Epoch milliseconds
    time Int64,
    -- [longitude, latitude, depth_km], empty when unknown
    coordinates Array(Float64),
    tsunami UInt32,
    is_simulated Bool,

    -- Replace-by-id ordering
    version UInt64,
    updated_at DateTime64(3) DEFAULT now64(3)
)
ENGINE = ReplacingMergeTree(version)
ORDER BY id
SETTINGS index_granularity = 8192
"#;

/// Table DDL in creation order.
pub fn all_tables() -> Vec<&'static str> {
    vec![CREATE_EVENTS_TABLE]
}
