//! Builds the plaintext token candidates for one location.

use std::collections::BTreeSet;

use log::trace;

use super::settings::TokenSettings;
use crate::location::geo::{location_to_geohash, GeoCircle};
use crate::location::time::WindowRounding;
use crate::location::types::RawLocation;

/// Turns a location into `<geohash><time window>` candidate strings.
///
/// Geohashes are collected into a sorted set, so the candidate order is the
/// same on every platform: for each geohash in ascending order, its early
/// window and then its late window.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use geotrace_core::location::RawLocation;
/// use geotrace_core::token::TokenAssembler;
///
/// let at = Utc.timestamp_millis_opt(1_590_000_000_000).unwrap();
/// let candidates = TokenAssembler::default().assemble(&RawLocation::new(at, 37.7749, -122.4194));
/// assert_eq!(candidates[0], "9q8yyk8y1589999700000");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TokenAssembler {
    circle: GeoCircle,
    precision: u8,
    interval_ms: i64,
    rounding: WindowRounding,
}

impl Default for TokenAssembler {
    fn default() -> Self {
        let settings = TokenSettings::default();
        Self {
            circle: GeoCircle::default(),
            precision: settings.geohash_precision,
            interval_ms: settings.window_interval_ms,
            rounding: settings.window_rounding,
        }
    }
}

impl TokenAssembler {
    /// Creates an assembler from (already validated) settings.
    #[must_use]
    pub fn new(settings: &TokenSettings) -> Self {
        Self {
            circle: GeoCircle::new(settings.circle_radius_m),
            precision: settings.geohash_precision,
            interval_ms: settings.window_interval_ms,
            rounding: settings.window_rounding,
        }
    }

    /// The distinct geohashes covering the circle around `location`.
    ///
    /// Empty if the location is not acceptable.
    #[must_use]
    pub fn geohashes(&self, location: &RawLocation) -> BTreeSet<String> {
        if !location.is_acceptable() {
            return BTreeSet::new();
        }

        self.circle
            .sample(location.latitude, location.longitude)
            .into_iter()
            .map(|(lat, lon)| location_to_geohash(lat, lon, self.precision))
            .filter(|hash| !hash.is_empty())
            .collect()
    }

    /// All token candidates for `location`.
    ///
    /// Empty if the location is not acceptable.
    #[must_use]
    pub fn assemble(&self, location: &RawLocation) -> Vec<String> {
        let Some(timestamp_ms) = location.timestamp_millis() else {
            return Vec::new();
        };
        let windows = self.rounding.windows(timestamp_ms, self.interval_ms);

        let geohashes = self.geohashes(location);
        trace!("Assembling candidates from {} geohashes", geohashes.len());

        geohashes
            .into_iter()
            .flat_map(|hash| {
                [
                    format!("{hash}{}", windows.early),
                    format!("{hash}{}", windows.late),
                ]
            })
            .collect()
    }
}
