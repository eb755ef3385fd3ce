//! Location data types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::token::matching::count_matching;

/// Coordinates whose absolute value is at or below this are treated as zero.
pub const DEGENERATE_COORDINATE_EPSILON: f64 = 1e-5;

/// Where a location came from.
///
/// Each variant has a stable integer code matching the values legacy stores
/// persisted, see [`LocationSource::code`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LocationSource {
    /// Sensed live on this device.
    #[default]
    Device,
    /// Carried over from a previous storage format.
    Migration,
    /// Imported from an external dataset (e.g. a location history export).
    External,
    /// Synthesized by the application, e.g. to fill a gap in the history.
    Assumed,
}

impl LocationSource {
    /// Returns the stable integer code for this source.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Device => 0,
            Self::Migration => 1,
            Self::External => 2,
            Self::Assumed => 3,
        }
    }

    /// Maps a legacy integer code back to a source.
    ///
    /// Returns `None` for codes that never named a source (legacy stores used
    /// `-1` for "unset").
    #[must_use]
    pub const fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Device),
            1 => Some(Self::Migration),
            2 => Some(Self::External),
            3 => Some(Self::Assumed),
            _ => None,
        }
    }
}

/// One observed or assumed position, as handed over by a location provider.
///
/// This is the boundary type: adapters convert whatever the platform
/// delivers into a `RawLocation` before anything in this crate touches it.
///
/// # Example
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use geotrace_core::location::{LocationSource, RawLocation};
///
/// let at = Utc.timestamp_millis_opt(1_590_000_000_000).unwrap();
/// let location = RawLocation::new(at, 37.7749, -122.4194)
///     .with_accuracy(8.0)
///     .with_source(LocationSource::Device);
/// assert!(location.is_acceptable());
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawLocation {
    /// When the position was observed. `None` makes the location unacceptable.
    pub timestamp: Option<DateTime<Utc>>,

    /// Latitude in degrees.
    pub latitude: f64,

    /// Longitude in degrees.
    pub longitude: f64,

    /// Horizontal accuracy in meters.
    pub accuracy: Option<f32>,

    /// Altitude in meters.
    pub altitude: Option<f64>,

    /// Vertical accuracy in meters.
    pub altitude_accuracy: Option<f32>,

    /// Speed in meters/second.
    pub speed: Option<f32>,

    /// Bearing in degrees.
    pub bearing: Option<f32>,

    /// Name of the provider that produced the fix, if known.
    pub provider: Option<String>,

    /// Where this location came from.
    pub source: LocationSource,
}

impl RawLocation {
    /// Creates a device location with no optional metadata.
    #[must_use]
    pub fn new(timestamp: DateTime<Utc>, latitude: f64, longitude: f64) -> Self {
        Self {
            timestamp: Some(timestamp),
            latitude,
            longitude,
            ..Self::default()
        }
    }

    /// Sets the source tag.
    #[must_use]
    pub const fn with_source(mut self, source: LocationSource) -> Self {
        self.source = source;
        self
    }

    /// Sets the horizontal accuracy.
    #[must_use]
    pub const fn with_accuracy(mut self, accuracy: f32) -> Self {
        self.accuracy = Some(accuracy);
        self
    }

    /// Sets altitude and, optionally, its accuracy.
    #[must_use]
    pub const fn with_altitude(mut self, altitude: f64, accuracy: Option<f32>) -> Self {
        self.altitude = Some(altitude);
        self.altitude_accuracy = accuracy;
        self
    }

    /// Sets speed and bearing.
    #[must_use]
    pub const fn with_motion(mut self, speed: f32, bearing: f32) -> Self {
        self.speed = Some(speed);
        self.bearing = Some(bearing);
        self
    }

    /// Sets the provider name.
    #[must_use]
    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    /// Milliseconds since the Unix epoch, if a timestamp is present.
    #[must_use]
    pub fn timestamp_millis(&self) -> Option<i64> {
        self.timestamp.as_ref().map(DateTime::timestamp_millis)
    }

    /// Whether this location may enter the hashing pipeline.
    ///
    /// Requires a timestamp, finite coordinates and a position that is not
    /// the `(0, 0)` placeholder some providers emit before they have a fix.
    ///
    /// ```
    /// use chrono::Utc;
    /// use geotrace_core::location::RawLocation;
    ///
    /// assert!(RawLocation::new(Utc::now(), 0.0, 0.000_02).is_acceptable());
    /// assert!(!RawLocation::new(Utc::now(), 0.0, 0.000_001).is_acceptable());
    /// ```
    #[must_use]
    pub fn is_acceptable(&self) -> bool {
        self.timestamp.is_some()
            && self.latitude.is_finite()
            && self.longitude.is_finite()
            && (self.latitude.abs() > DEGENERATE_COORDINATE_EPSILON
                || self.longitude.abs() > DEGENERATE_COORDINATE_EPSILON)
    }
}

/// A location as persisted locally, together with its hashed tokens.
///
/// Coordinates and metadata stay on the device. Only the
/// [`SharableLocation`] projection is meant to leave it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HashedLocationRecord {
    /// Unique record identifier.
    pub id: Uuid,

    /// When the position was observed (UTC).
    pub timestamp: DateTime<Utc>,

    /// Latitude in degrees.
    pub latitude: f64,

    /// Longitude in degrees.
    pub longitude: f64,

    /// Where this location came from.
    pub source: LocationSource,

    /// Horizontal accuracy in meters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f32>,

    /// Altitude in meters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub altitude: Option<f64>,

    /// Vertical accuracy in meters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub altitude_accuracy: Option<f32>,

    /// Speed in meters/second.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f32>,

    /// Bearing in degrees.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bearing: Option<f32>,

    /// Location provider name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,

    /// Opaque hex tokens derived from this location.
    #[serde(default)]
    pub tokens: Vec<String>,
}

impl HashedLocationRecord {
    /// Builds an untokenized record from a raw location.
    ///
    /// Returns `None` if the location has no timestamp.
    #[must_use]
    pub fn from_raw(location: &RawLocation) -> Option<Self> {
        let timestamp = location.timestamp?;
        Some(Self {
            id: Uuid::new_v4(),
            timestamp,
            latitude: location.latitude,
            longitude: location.longitude,
            source: location.source,
            accuracy: location.accuracy,
            altitude: location.altitude,
            altitude_accuracy: location.altitude_accuracy,
            speed: location.speed,
            bearing: location.bearing,
            provider: location.provider.clone(),
            tokens: Vec::new(),
        })
    }

    /// Converts the record back into a raw location, e.g. to rehash it
    /// under a newer token format.
    #[must_use]
    pub fn to_raw_location(&self) -> RawLocation {
        RawLocation {
            timestamp: Some(self.timestamp),
            latitude: self.latitude,
            longitude: self.longitude,
            accuracy: self.accuracy,
            altitude: self.altitude,
            altitude_accuracy: self.altitude_accuracy,
            speed: self.speed,
            bearing: self.bearing,
            provider: self.provider.clone(),
            source: self.source,
        }
    }

    /// Appends tokens, skipping any the record already holds.
    pub fn append_tokens<I, S>(&mut self, tokens: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for token in tokens {
            let token = token.into();
            if !self.tokens.contains(&token) {
                self.tokens.push(token);
            }
        }
    }

    /// Whether any of this record's tokens appears in `published`.
    ///
    /// Every pair is compared in constant time, so the running time does not
    /// depend on which tokens matched.
    #[must_use]
    pub fn matches_any(&self, published: &[String]) -> bool {
        count_matching(&self.tokens, published) > 0
    }

    /// The projection of this record that may be shared with others.
    #[must_use]
    pub fn to_sharable(&self) -> SharableLocation {
        SharableLocation {
            time: self.timestamp.timestamp_millis(),
            latitude: self.latitude,
            longitude: self.longitude,
            hashes: self.tokens.clone(),
        }
    }
}

/// Export shape: `{time, latitude, longitude, hashes}` with `time` in
/// milliseconds since the Unix epoch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharableLocation {
    /// Milliseconds since the Unix epoch.
    pub time: i64,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Hex tokens.
    pub hashes: Vec<String>,
}
