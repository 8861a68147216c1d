//! Seismic event records and the ingest payload boundary.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::error::{Error, Result, ValidationErrorCode};
use crate::limits::{GENERATED_ID_PREFIX, MAX_MAGNITUDE, MIN_MAGNITUDE, SIMULATED_ID_PREFIX};
use crate::risk::RiskLevel;

/// GeoJSON-style position: longitude, latitude, depth in km.
///
/// Serialized as a 3-element array to match the sensor feed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct Coordinates {
    pub longitude: f64,
    pub latitude: f64,
    pub depth_km: f64,
}

impl Coordinates {
    pub fn new(longitude: f64, latitude: f64, depth_km: f64) -> Self {
        Self {
            longitude,
            latitude,
            depth_km,
        }
    }

    /// Builds coordinates from a raw component list, requiring exactly three.
    pub fn from_components(components: &[f64]) -> Result<Self> {
        match components {
            [lon, lat, depth] => Ok(Self::new(*lon, *lat, *depth)),
            other => Err(Error::out_of_range(format!(
                "coordinates must have 3 components (longitude, latitude, depth), got {}",
                other.len()
            ))),
        }
    }

    fn check_bounds(&self) -> Result<()> {
        if !(self.longitude.is_finite() && self.latitude.is_finite() && self.depth_km.is_finite())
        {
            return Err(Error::out_of_range("coordinates must be finite numbers"));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(Error::out_of_range(format!(
                "longitude {} outside [-180, 180]",
                self.longitude
            )));
        }
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(Error::out_of_range(format!(
                "latitude {} outside [-90, 90]",
                self.latitude
            )));
        }
        Ok(())
    }
}

impl From<[f64; 3]> for Coordinates {
    fn from([longitude, latitude, depth_km]: [f64; 3]) -> Self {
        Self::new(longitude, latitude, depth_km)
    }
}

impl From<Coordinates> for [f64; 3] {
    fn from(c: Coordinates) -> Self {
        [c.longitude, c.latitude, c.depth_km]
    }
}

/// A stored seismic event.
///
/// Identity is `id`; the store replaces whole records by id, never fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: String,
    pub place: String,
    pub magnitude: f64,
    /// Epoch milliseconds
    pub time: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    /// Tsunami indicator; any value above zero means a warning was issued
    #[serde(default)]
    pub tsunami: u32,
    #[serde(rename = "is_simulated", default)]
    pub simulated: bool,
}

impl EventRecord {
    pub fn risk(&self) -> RiskLevel {
        RiskLevel::classify(self.magnitude)
    }

    pub fn has_tsunami(&self) -> bool {
        self.tsunami > 0
    }

    /// Depth in km, when coordinates are known.
    pub fn depth_km(&self) -> Option<f64> {
        self.coordinates.map(|c| c.depth_km)
    }

    /// Whether this record came from the simulation generator.
    pub fn is_synthetic(&self) -> bool {
        self.simulated || self.id.starts_with(SIMULATED_ID_PREFIX)
    }
}

fn default_place() -> String {
    "Unknown".to_string()
}

/// Untyped inbound record as posted by the sensor agent.
///
/// Converted into an [`EventRecord`] by [`IngestPayload::into_record`], which
/// rejects anything that would be ambiguous once stored.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct IngestPayload {
    #[validate(length(max = 256))]
    pub id: Option<String>,
    #[serde(default = "default_place")]
    #[validate(length(max = 512))]
    pub place: String,
    pub magnitude: f64,
    #[validate(range(min = 0))]
    pub time: i64,
    pub coordinates: Option<Vec<f64>>,
    #[serde(default)]
    pub tsunami: u32,
    pub is_simulated: Option<bool>,
}

impl IngestPayload {
    /// Parses a raw request body.
    pub fn parse(body: &[u8]) -> Result<Self> {
        serde_json::from_slice(body).map_err(|e| {
            Error::validation_code(
                ValidationErrorCode::InvalidFormat,
                format!("invalid event payload: {}", e),
            )
        })
    }

    /// Validates and converts into a storable record of external origin.
    pub fn into_record(self) -> Result<EventRecord> {
        self.validate()
            .map_err(|e| Error::out_of_range(e.to_string()))?;

        if !(MIN_MAGNITUDE..=MAX_MAGNITUDE).contains(&self.magnitude) {
            return Err(Error::out_of_range(format!(
                "magnitude {} outside [{}, {}]",
                self.magnitude, MIN_MAGNITUDE, MAX_MAGNITUDE
            )));
        }

        if self.is_simulated == Some(true) {
            return Err(Error::validation_code(
                ValidationErrorCode::ReservedOrigin,
                "simulated records cannot be ingested",
            ));
        }

        let id = match self.id.map(|id| id.trim().to_string()) {
            Some(id) if !id.is_empty() => id,
            _ => format!("{}{}", GENERATED_ID_PREFIX, Uuid::new_v4().simple()),
        };

        if id.starts_with(SIMULATED_ID_PREFIX) {
            return Err(Error::validation_code(
                ValidationErrorCode::ReservedOrigin,
                format!("id prefix '{}' is reserved for simulated records", SIMULATED_ID_PREFIX),
            ));
        }

        let coordinates = match self.coordinates {
            Some(components) => {
                let coords = Coordinates::from_components(&components)?;
                coords.check_bounds()?;
                Some(coords)
            }
            None => None,
        };

        Ok(EventRecord {
            id,
            place: self.place,
            magnitude: self.magnitude,
            time: self.time,
            coordinates,
            tsunami: self.tsunami,
            simulated: false,
        })
    }
}
