//! Synthetic event generator for demos and load checks.
//!
//! Generated records carry `simulated = true` and the reserved id prefix, so
//! any retention sweep removes them.

use chrono::{DateTime, Utc};
use rand::Rng;
use uuid::Uuid;

use crate::events::{Coordinates, EventRecord};
use crate::limits::SIMULATED_ID_PREFIX;

/// Cities used for synthetic place names (US West Coast).
pub const SIMULATION_CITIES: &[&str] = &[
    "San Francisco, CA",
    "Los Angeles, CA",
    "Seattle, WA",
    "Portland, OR",
    "San Diego, CA",
];

pub const SIM_MAGNITUDE_MIN: f64 = 5.0;
pub const SIM_MAGNITUDE_MAX: f64 = 9.0;
pub const SIM_LATITUDE: (f64, f64) = (32.0, 48.0);
pub const SIM_LONGITUDE: (f64, f64) = (-124.0, -115.0);
pub const SIM_DEPTH_KM: f64 = 10.0;

/// Builds one synthetic record timestamped at `now`.
pub fn synthetic_event<R: Rng + ?Sized>(rng: &mut R, now: DateTime<Utc>) -> EventRecord {
    let city = SIMULATION_CITIES[rng.random_range(0..SIMULATION_CITIES.len())];
    let latitude = rng.random_range(SIM_LATITUDE.0..=SIM_LATITUDE.1);
    let longitude = rng.random_range(SIM_LONGITUDE.0..=SIM_LONGITUDE.1);
    let magnitude = rng.random_range(SIM_MAGNITUDE_MIN..=SIM_MAGNITUDE_MAX);

    EventRecord {
        id: format!("{}us_{}", SIMULATED_ID_PREFIX, Uuid::new_v4().simple()),
        place: format!("SIMULATION: {}", city),
        magnitude,
        time: now.timestamp_millis(),
        coordinates: Some(Coordinates::new(longitude, latitude, SIM_DEPTH_KM)),
        tsunami: 0,
        simulated: true,
    }
}
