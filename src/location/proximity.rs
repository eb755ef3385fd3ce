//! "Close enough to matter" test between two raw positions.

/// Anything closer than this, in meters, is nearby.
pub const NEARBY_DISTANCE_M: f64 = 20.0;

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

// Degree equivalents of NEARBY_DISTANCE_M (distance / meters-per-degree).
// Longitude values are for the upper edge of each band, where a degree is
// shortest, so they never reject a pair that is actually nearby.
const NOT_NEARBY_LATITUDE: f64 = 0.000_179_66; // 20 / 111_320
const NOT_NEARBY_LONGITUDE_23: f64 = 0.000_195_18; // 20 / 102_470
const NOT_NEARBY_LONGITUDE_45: f64 = 0.000_254_1; // 20 / 78_710
const NOT_NEARBY_LONGITUDE_67: f64 = 0.000_459_81; // 20 / 43_496

/// Longitude threshold for the band containing `abs_lat`, if there is one.
fn longitude_threshold(abs_lat: f64) -> Option<f64> {
    if abs_lat < 23.0 {
        Some(NOT_NEARBY_LONGITUDE_23)
    } else if abs_lat < 45.0 {
        Some(NOT_NEARBY_LONGITUDE_45)
    } else if abs_lat < 67.0 {
        Some(NOT_NEARBY_LONGITUDE_67)
    } else {
        None
    }
}

/// Great-circle distance in meters (spherical law of cosines).
///
/// ```
/// use geotrace_core::location::spherical_distance_m;
///
/// let d = spherical_distance_m(51.5007, -0.1246, 51.5033, -0.1196);
/// assert!((d - 451.0).abs() < 1.0);
/// ```
#[must_use]
pub fn spherical_distance_m(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let p1 = lat1.to_radians();
    let p2 = lat2.to_radians();
    let delta_lambda = (lon2 - lon1).abs().to_radians();

    // Rounding can push the cosine just past ±1, where acos is NaN.
    let cosine = p1
        .sin()
        .mul_add(p2.sin(), p1.cos() * p2.cos() * delta_lambda.cos())
        .clamp(-1.0, 1.0);

    cosine.acos() * EARTH_RADIUS_M
}

/// Whether two positions are less than [`NEARBY_DISTANCE_M`] apart.
///
/// Most pairs are far apart, so a degree-delta check rejects them before any
/// trigonometry runs. The longitude band is picked from the larger of the two
/// latitudes, which keeps the result symmetric in its arguments.
///
/// ```
/// use geotrace_core::location::is_nearby;
///
/// assert!(is_nearby(40.0, -74.0, 40.0001, -74.0));
/// assert!(!is_nearby(40.0, -74.0, 40.001, -74.0));
/// ```
#[must_use]
pub fn is_nearby(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> bool {
    if (lat2 - lat1).abs() > NOT_NEARBY_LATITUDE {
        return false;
    }

    if let Some(threshold) = longitude_threshold(lat1.abs().max(lat2.abs())) {
        if (lon2 - lon1).abs() > threshold {
            return false;
        }
    }

    spherical_distance_m(lat1, lon1, lat2, lon2) < NEARBY_DISTANCE_M
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Degrees of latitude spanning `meters` on the model sphere.
    fn meridian_degrees(meters: f64) -> f64 {
        (meters / EARTH_RADIUS_M).to_degrees()
    }

    /// Degrees of longitude spanning `meters` along the parallel at `lat`.
    fn parallel_degrees(meters: f64, lat: f64) -> f64 {
        meridian_degrees(meters) / lat.to_radians().cos()
    }

    #[test]
    fn same_point_is_nearby() {
        for (lat, lon) in [(0.0, 0.0), (37.7749, -122.4194), (-33.86, 151.2), (89.9, 10.0)] {
            assert!(is_nearby(lat, lon, lat, lon), "({lat}, {lon})");
        }
    }

    #[test]
    fn nineteen_meters_on_meridian_is_nearby() {
        let lat = 40.0;
        assert!(is_nearby(lat, -74.0, lat + meridian_degrees(19.0), -74.0));
    }

    #[test]
    fn twenty_five_meters_on_meridian_is_not_nearby() {
        let lat = 40.0;
        assert!(!is_nearby(lat, -74.0, lat + meridian_degrees(25.0), -74.0));
    }

    #[test]
    fn nineteen_meters_east_in_every_band() {
        for lat in [0.0, 10.0, 30.0, 50.0, 60.0, 70.0, 80.0] {
            let lon = 20.0;
            assert!(
                is_nearby(lat, lon, lat, lon + parallel_degrees(19.0, lat)),
                "lat {lat}"
            );
        }
    }

    #[test]
    fn thirty_meters_east_in_every_band_is_not_nearby() {
        for lat in [0.0, 10.0, 30.0, 50.0, 60.0, 70.0, 80.0] {
            let lon = 20.0;
            assert!(
                !is_nearby(lat, lon, lat, lon + parallel_degrees(30.0, lat)),
                "lat {lat}"
            );
        }
    }

    #[test]
    fn high_latitude_has_no_longitude_shortcut() {
        // 0.0006° of longitude is beyond every band threshold but only ~10 m at 81.5°.
        assert!(is_nearby(81.5, 0.0, 81.5, 0.0006));
    }

    #[test]
    fn symmetric_across_band_boundary() {
        let (lat1, lon1) = (22.999_95, 100.0);
        let (lat2, lon2) = (23.000_05, 100.000_15);

        assert_eq!(
            is_nearby(lat1, lon1, lat2, lon2),
            is_nearby(lat2, lon2, lat1, lon1)
        );
    }

    #[test]
    fn southern_hemisphere_uses_absolute_latitude() {
        let lat = -60.0;
        assert!(is_nearby(lat, 20.0, lat, 20.0 + parallel_degrees(19.0, lat)));
    }

    #[test]
    fn distance_is_zero_for_same_point() {
        assert!(spherical_distance_m(45.0, 45.0, 45.0, 45.0) < 0.5);
    }

    #[test]
    fn distance_never_nan() {
        for (lat, lon) in [(0.0, 0.0), (45.0, 45.0), (89.999_999, 179.999_999)] {
            assert!(!spherical_distance_m(lat, lon, lat, lon).is_nan());
        }
    }

    #[test]
    fn distance_antipodal() {
        let d = spherical_distance_m(0.0, 0.0, 0.0, 180.0);
        assert!((d - std::f64::consts::PI * EARTH_RADIUS_M).abs() < 1.0);
    }

    #[test]
    fn band_thresholds() {
        assert_eq!(longitude_threshold(0.0), Some(NOT_NEARBY_LONGITUDE_23));
        assert_eq!(longitude_threshold(23.0), Some(NOT_NEARBY_LONGITUDE_45));
        assert_eq!(longitude_threshold(45.0), Some(NOT_NEARBY_LONGITUDE_67));
        assert_eq!(longitude_threshold(67.0), None);
    }
}
