//! Parsing of imported location history.
//!
//! Imported records arrive as loosely typed key/value objects, usually the
//! sharable export of another device:
//!
//! ```json
//! { "time": 1590000000000, "latitude": 37.7749, "longitude": -122.4194,
//!   "hashes": ["e0a9052ac6f3e604"] }
//! ```
//!
//! A record that cannot be parsed is skipped as a whole. Partial records are
//! never produced.

use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde_json::Value;
use uuid::Uuid;

use super::types::{HashedLocationRecord, LocationSource};

const KEY_TIME: &str = "time";
const KEY_LATITUDE: &str = "latitude";
const KEY_LONGITUDE: &str = "longitude";
const KEY_HASHES: &str = "hashes";

impl HashedLocationRecord {
    /// Parses one imported record.
    ///
    /// Returns `None` if `time`, `latitude` or `longitude` is missing or
    /// unparsable, or if either coordinate is exactly `0.0`. `time` may be a
    /// number or a numeric string, in milliseconds since the epoch. `hashes`
    /// is optional, and is ignored unless it is an array of strings.
    ///
    /// # Examples
    ///
    /// ```
    /// use geotrace_core::location::{HashedLocationRecord, LocationSource};
    /// use serde_json::json;
    ///
    /// let value = json!({"time": "1590000000000", "latitude": 37.7749, "longitude": -122.4194});
    /// let record = HashedLocationRecord::from_import(&value, LocationSource::External).unwrap();
    /// assert_eq!(record.timestamp.timestamp_millis(), 1_590_000_000_000);
    ///
    /// let zero = json!({"time": 1590000000000_i64, "latitude": 0.0, "longitude": -122.4194});
    /// assert!(HashedLocationRecord::from_import(&zero, LocationSource::External).is_none());
    /// ```
    #[must_use]
    pub fn from_import(value: &Value, source: LocationSource) -> Option<Self> {
        let object = value.as_object()?;

        let Some(timestamp) = object.get(KEY_TIME).and_then(parse_time) else {
            debug!("Import record rejected: missing or unparsable time");
            return None;
        };
        let latitude = object.get(KEY_LATITUDE).and_then(parse_coordinate)?;
        let longitude = object.get(KEY_LONGITUDE).and_then(parse_coordinate)?;

        // Exactly zero is what broken exporters write for "unknown".
        if latitude == 0.0 || longitude == 0.0 {
            debug!("Import record rejected: zero coordinate");
            return None;
        }

        let tokens = object
            .get(KEY_HASHES)
            .and_then(Value::as_array)
            .and_then(|hashes| {
                hashes
                    .iter()
                    .map(|hash| hash.as_str().map(str::to_owned))
                    .collect::<Option<Vec<_>>>()
            })
            .unwrap_or_default();

        Some(Self {
            id: Uuid::new_v4(),
            timestamp,
            latitude,
            longitude,
            source,
            accuracy: None,
            altitude: None,
            altitude_accuracy: None,
            speed: None,
            bearing: None,
            provider: None,
            tokens,
        })
    }
}

/// Parses a batch of imported records, dropping the ones that don't parse.
#[must_use]
pub fn import_records(values: &[Value], source: LocationSource) -> Vec<HashedLocationRecord> {
    let records: Vec<_> = values
        .iter()
        .filter_map(|value| HashedLocationRecord::from_import(value, source))
        .collect();

    let dropped = values.len() - records.len();
    if dropped > 0 {
        warn!("Dropped {dropped} of {} imported location records", values.len());
    }

    records
}

fn parse_time(value: &Value) -> Option<DateTime<Utc>> {
    let millis = match value {
        Value::String(text) => text.parse::<f64>().ok()?,
        Value::Number(number) => number.as_f64()?,
        _ => return None,
    };
    millis_to_datetime(millis)
}

#[allow(clippy::cast_possible_truncation)] // Saturating cast; out-of-range values fail below.
fn millis_to_datetime(millis: f64) -> Option<DateTime<Utc>> {
    if !millis.is_finite() {
        return None;
    }
    DateTime::from_timestamp_micros((millis * 1000.0).round() as i64)
}

fn parse_coordinate(value: &Value) -> Option<f64> {
    value.as_f64().filter(|coordinate| coordinate.is_finite())
}
