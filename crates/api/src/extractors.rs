//! Request extractors for query-string parameters.
//!
//! Parameters arrive as raw strings so malformed values surface as coded
//! validation errors instead of axum's plain-text rejection.

use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use quake_core::{Error, EventFilter, ValidationErrorCode};
use serde::Deserialize;

use crate::response::ApiError;

#[derive(Debug, Default, Deserialize)]
struct RawEventsQuery {
    min_mag: Option<String>,
    place: Option<String>,
    limit: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawCleanupQuery {
    hours: Option<String>,
}

/// Parsed `GET /api/events` parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct EventsQuery {
    pub filter: EventFilter,
    /// Zero means unbounded.
    pub limit: usize,
}

/// Parsed `DELETE /api/cleanup` parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleanupQuery {
    /// `None` uses the configured retention window, as do zero and negative values.
    pub hours: Option<u64>,
}

/// `/api/events` hides negative-magnitude micro events unless asked.
pub const DEFAULT_MIN_MAGNITUDE: f64 = 0.0;

fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn invalid(name: &str, value: &str) -> Error {
    Error::validation_code(
        ValidationErrorCode::InvalidFormat,
        format!("{} must be a number, got '{}'", name, value),
    )
}

impl EventsQuery {
    fn from_raw(raw: RawEventsQuery) -> Result<Self, Error> {
        let min = match present(raw.min_mag) {
            None => DEFAULT_MIN_MAGNITUDE,
            Some(value) => value
                .parse::<f64>()
                .ok()
                .filter(|m| m.is_finite())
                .ok_or_else(|| invalid("min_mag", &value))?,
        };
        let mut filter = EventFilter::new().with_min_magnitude(min);

        if let Some(place) = present(raw.place) {
            filter = filter.with_place(place);
        }

        let limit = match present(raw.limit) {
            None => 0,
            Some(value) => {
                let n = value.parse::<i64>().map_err(|_| invalid("limit", &value))?;
                if n <= 0 {
                    return Err(Error::out_of_range(format!(
                        "limit must be a positive integer, got {}",
                        n
                    )));
                }
                usize::try_from(n).unwrap_or(usize::MAX)
            }
        };

        Ok(Self { filter, limit })
    }
}

impl CleanupQuery {
    fn from_raw(raw: RawCleanupQuery) -> Result<Self, Error> {
        let Some(value) = present(raw.hours) else {
            return Ok(Self { hours: None });
        };

        let hours = value.parse::<i64>().map_err(|_| invalid("hours", &value))?;
        Ok(Self {
            hours: u64::try_from(hours).ok().filter(|h| *h > 0),
        })
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for EventsQuery
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Query(raw) = Query::<RawEventsQuery>::try_from_uri(&parts.uri)
            .map_err(|e| ApiError::bad_request(e.body_text()))?;
        Ok(Self::from_raw(raw)?)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CleanupQuery
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Query(raw) = Query::<RawCleanupQuery>::try_from_uri(&parts.uri)
            .map_err(|e| ApiError::bad_request(e.body_text()))?;
        Ok(Self::from_raw(raw)?)
    }
}
