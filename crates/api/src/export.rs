//! CSV rendering for `/api/export`.

use chrono::DateTime;
use quake_core::{Error, EventRecord, Result};

pub const EXPORT_FILENAME: &str = "seismic_report.csv";

pub const EXPORT_HEADER: [&str; 6] = [
    "Timestamp",
    "Place",
    "Magnitude",
    "Depth (km)",
    "Tsunami",
    "Risk",
];

/// `YYYY-MM-DD HH:MM:SS.mmm` in UTC. Out-of-range instants render empty.
pub fn format_timestamp(epoch_ms: i64) -> String {
    DateTime::from_timestamp_millis(epoch_ms)
        .map(|t| t.format("%Y-%m-%d %H:%M:%S%.3f").to_string())
        .unwrap_or_default()
}

pub fn format_depth(record: &EventRecord) -> String {
    match record.depth_km() {
        Some(depth) => format!("{:.1}", depth),
        None => "0".to_string(),
    }
}

/// Renders `records` in the order given, header first.
pub fn render_csv(records: &[EventRecord]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(EXPORT_HEADER)
        .map_err(|e| Error::internal(format!("CSV write failed: {}", e)))?;

    for record in records {
        let timestamp = format_timestamp(record.time);
        let magnitude = format!("{:.2}", record.magnitude);
        let depth = format_depth(record);
        let tsunami = if record.has_tsunami() { "YES" } else { "NO" };

        writer
            .write_record([
                timestamp.as_str(),
                record.place.as_str(),
                magnitude.as_str(),
                depth.as_str(),
                tsunami,
                record.risk().as_str(),
            ])
            .map_err(|e| Error::internal(format!("CSV write failed: {}", e)))?;
    }

    writer
        .into_inner()
        .map_err(|e| Error::internal(format!("CSV flush failed: {}", e)))
}
