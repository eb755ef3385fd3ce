//! Neighborhood sampling and geohash encoding.
//!
//! A GPS fix is only accurate to a few meters, and two people standing next
//! to each other rarely land in the same geohash cell. To make matching
//! tolerant of that jitter, every location is expanded into a small circle of
//! sample points and each point is geohashed separately.

use std::sync::LazyLock;

/// Radius of the default sampling circle in meters.
pub const DEFAULT_CIRCLE_RADIUS_M: f64 = 10.0;

/// Meters per degree of latitude (and of longitude at the equator).
pub const METERS_PER_DEGREE: f64 = 111_320.0;

/// Geohash length used for tokens. Cells are roughly 38 m × 19 m.
pub const DEFAULT_GEOHASH_PRECISION: u8 = 8;

/// Longest geohash the encoder supports.
pub const MAX_GEOHASH_PRECISION: u8 = 12;

static DEFAULT_CIRCLE: LazyLock<GeoCircle> =
    LazyLock::new(|| GeoCircle::new(DEFAULT_CIRCLE_RADIUS_M));

/// A latitude/longitude delta in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoOffset {
    /// Latitude delta in degrees.
    pub latitude: f64,
    /// Longitude delta in degrees.
    pub longitude: f64,
}

/// A fixed table of offsets approximating a circle around the origin.
///
/// The table holds the center followed by the eight compass points
/// (N, NE, E, SE, S, SW, W, NW).
///
/// # Examples
///
/// ```
/// use geotrace_core::location::GeoCircle;
///
/// let points = GeoCircle::default_radius().sample(37.7749, -122.4194);
/// assert_eq!(points.len(), 9);
/// assert_eq!(points[0], (37.7749, -122.4194));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoCircle {
    radius_m: f64,
    offsets: [GeoOffset; 9],
}

impl GeoCircle {
    /// Builds the offset table for a circle of `radius_m` meters.
    ///
    /// Longitude deltas use the equatorial scale, so away from the equator
    /// the east/west points sit slightly inside the nominal radius.
    #[must_use]
    pub fn new(radius_m: f64) -> Self {
        let straight = radius_m / METERS_PER_DEGREE;
        let diagonal = straight * std::f64::consts::FRAC_1_SQRT_2;
        let at = |latitude, longitude| GeoOffset {
            latitude,
            longitude,
        };

        Self {
            radius_m,
            offsets: [
                at(0.0, 0.0),
                at(straight, 0.0),
                at(diagonal, diagonal),
                at(0.0, straight),
                at(-diagonal, diagonal),
                at(-straight, 0.0),
                at(-diagonal, -diagonal),
                at(0.0, -straight),
                at(diagonal, -diagonal),
            ],
        }
    }

    /// The shared 10 m circle, computed once per process.
    #[must_use]
    pub fn default_radius() -> &'static Self {
        &DEFAULT_CIRCLE
    }

    /// Radius this table was built for.
    #[must_use]
    pub const fn radius_m(&self) -> f64 {
        self.radius_m
    }

    /// The raw offset table.
    #[must_use]
    pub const fn offsets(&self) -> &[GeoOffset; 9] {
        &self.offsets
    }

    /// Applies every offset to the given center.
    ///
    /// Results are normalized: latitude is clamped to the poles and longitude
    /// wraps across the antimeridian.
    #[must_use]
    pub fn sample(&self, lat: f64, lon: f64) -> Vec<(f64, f64)> {
        self.offsets
            .iter()
            .map(|offset| {
                (
                    (lat + offset.latitude).clamp(-90.0, 90.0),
                    wrap_longitude(lon + offset.longitude),
                )
            })
            .collect()
    }
}

impl Default for GeoCircle {
    fn default() -> Self {
        *Self::default_radius()
    }
}

fn wrap_longitude(lon: f64) -> f64 {
    if (-180.0..=180.0).contains(&lon) {
        lon
    } else {
        (lon + 180.0).rem_euclid(360.0) - 180.0
    }
}

/// Converts latitude/longitude to a geohash string.
///
/// # Geohash Precision Table
///
/// | Length | Cell Width | Cell Height |
/// |--------|-----------|-------------|
/// | 5      | ±2.4 km   | ±2.4 km     |
/// | 6      | ±0.61 km  | ±0.61 km    |
/// | 7      | ±0.076 km | ±0.15 km    |
/// | 8      | ±0.019 km | ±0.019 km   |
///
/// # Examples
///
/// ```
/// use geotrace_core::location::location_to_geohash;
///
/// assert_eq!(location_to_geohash(37.7749, -122.4194, 8), "9q8yyk8y");
/// ```
///
/// # Error Handling
///
/// Returns an empty string if the coordinates cannot be encoded (NaN,
/// infinite or out of range) or the precision is outside `1..=12`.
#[must_use]
pub fn location_to_geohash(lat: f64, lon: f64, precision: u8) -> String {
    if precision == 0 || precision > MAX_GEOHASH_PRECISION {
        return String::new();
    }
    geohash::encode(geohash::Coord { x: lon, y: lat }, precision as usize)
        .unwrap_or_else(|_| String::new())
}

/// Decodes a geohash string to the center of its cell.
///
/// Returns `None` for empty or malformed input.
///
/// ```
/// use geotrace_core::location::{geohash_to_location, location_to_geohash};
///
/// let hash = location_to_geohash(37.7749, -122.4194, 8);
/// let (lat, lon) = geohash_to_location(&hash).unwrap();
/// assert!((lat - 37.7749).abs() < 0.0002);
/// assert!((lon + 122.4194).abs() < 0.0002);
/// ```
#[must_use]
pub fn geohash_to_location(hash: &str) -> Option<(f64, f64)> {
    if hash.is_empty() {
        return None;
    }
    geohash::decode(hash)
        .ok()
        .map(|(coord, _, _)| (coord.y, coord.x))
}
