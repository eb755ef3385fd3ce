//! Property-based tests for location sampling, windows and proximity.
//!
//! These tests verify:
//! - P1: The proximity test is symmetric and reflexive
//! - P2: Time windows are aligned, one interval apart, and bracket the timestamp
//! - P3: Circle sampling stays in valid coordinate ranges
//! - P4: Import rejects exact-zero coordinates and keeps everything else

use chrono::{TimeZone, Utc};
use geotrace_core::location::{
    is_nearby, spherical_distance_m, time_windows, GeoCircle, HashedLocationRecord,
    LocationSource, RawLocation, WindowRounding,
};
use proptest::prelude::*;
use serde_json::json;

// ============================================================================
// P1: Proximity
// ============================================================================

/// Verifies that the poles do not trip up the band selection.
#[test]
fn p1_pole_is_near_itself() {
    assert!(is_nearby(90.0, 0.0, 90.0, 0.0));
    assert!(is_nearby(-90.0, 45.0, -90.0, 45.0));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Whether two points are nearby does not depend on argument order.
    #[test]
    fn p1_is_nearby_symmetric(
        lat1 in -89.0_f64..89.0,
        lon1 in -179.0_f64..179.0,
        dlat in -0.0005_f64..0.0005,
        dlon in -0.0005_f64..0.0005,
    ) {
        let (lat2, lon2) = (lat1 + dlat, lon1 + dlon);
        prop_assert_eq!(is_nearby(lat1, lon1, lat2, lon2), is_nearby(lat2, lon2, lat1, lon1));
    }

    /// Every point is nearby itself.
    #[test]
    fn p1_is_nearby_reflexive(lat in -89.9_f64..89.9, lon in -180.0_f64..180.0) {
        prop_assert!(is_nearby(lat, lon, lat, lon));
        prop_assert!(spherical_distance_m(lat, lon, lat, lon) < 1.0);
    }

    /// Points far apart in latitude are never nearby.
    #[test]
    fn p1_far_in_latitude_never_nearby(
        lat in -80.0_f64..80.0,
        lon in -179.0_f64..179.0,
        dlat in 0.001_f64..1.0,
    ) {
        prop_assert!(!is_nearby(lat, lon, lat + dlat, lon));
    }
}

// ============================================================================
// P2: Time windows
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// With an even interval, windows sit on interval boundaries exactly one
    /// interval apart, with the timestamp within half an interval of the late
    /// window.
    #[test]
    fn p2_windows_bracket_timestamp(
        t in -4_000_000_000_000_i64..4_000_000_000_000,
        interval in (1_i64..43_200_000).prop_map(|half| half * 2),
    ) {
        let windows = time_windows(t, interval);

        prop_assert_eq!(windows.late - windows.early, interval);
        prop_assert_eq!(windows.early.rem_euclid(interval), 0);
        prop_assert!(windows.early < t);
        prop_assert!((t - windows.late).abs() <= interval / 2);
    }

    /// Any positive interval keeps the windows aligned and at most one
    /// interval apart.
    #[test]
    fn p2_any_interval_aligned(
        t in -4_000_000_000_000_i64..4_000_000_000_000,
        interval in 1_i64..86_400_000,
    ) {
        let windows = time_windows(t, interval);
        let gap = windows.late - windows.early;

        prop_assert!(gap == 0 || gap == interval);
        prop_assert_eq!(windows.early.rem_euclid(interval), 0);
        prop_assert_eq!(windows.late.rem_euclid(interval), 0);
    }

    /// Floor and truncate agree once `t - interval / 2` is non-negative.
    #[test]
    fn p2_rounding_modes_agree_after_epoch(t in 150_000_i64..4_000_000_000_000) {
        prop_assert_eq!(
            WindowRounding::Floor.windows(t, 300_000),
            WindowRounding::Truncate.windows(t, 300_000)
        );
    }
}

// ============================================================================
// P3: Circle sampling
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Sampled points are always valid coordinates, even at the poles and
    /// across the antimeridian.
    #[test]
    fn p3_samples_in_range(
        lat in -90.0_f64..=90.0,
        lon in -180.0_f64..=180.0,
        radius in 0.0_f64..1_000.0,
    ) {
        let samples = GeoCircle::new(radius).sample(lat, lon);

        prop_assert_eq!(samples.len(), 9);
        prop_assert_eq!(samples[0], (lat, lon));
        for (sample_lat, sample_lon) in samples {
            prop_assert!((-90.0..=90.0).contains(&sample_lat));
            prop_assert!((-180.0..=180.0).contains(&sample_lon));
        }
    }
}

// ============================================================================
// P4: Import
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// An exact zero in either coordinate rejects the record.
    #[test]
    fn p4_zero_coordinate_rejected(other in -90.0_f64..90.0, time in 0_i64..4_000_000_000_000) {
        let zero_lat = json!({"time": time, "latitude": 0.0, "longitude": other});
        let zero_lon = json!({"time": time, "latitude": other, "longitude": 0.0});

        prop_assert!(HashedLocationRecord::from_import(&zero_lat, LocationSource::External).is_none());
        prop_assert!(HashedLocationRecord::from_import(&zero_lon, LocationSource::External).is_none());
    }

    /// Non-zero coordinates import with the timestamp intact.
    #[test]
    fn p4_nonzero_coordinates_accepted(
        lat in 0.001_f64..89.0,
        lon in 0.001_f64..179.0,
        time in 0_i64..4_000_000_000_000,
    ) {
        let value = json!({"time": time.to_string(), "latitude": -lat, "longitude": lon});
        let record = HashedLocationRecord::from_import(&value, LocationSource::External);

        prop_assert!(record.is_some());
        let record = record.unwrap();
        prop_assert_eq!(record.timestamp.timestamp_millis(), time);
        prop_assert!(record.tokens.is_empty());
    }

    /// Tiny non-zero coordinates import but are not acceptable for hashing.
    #[test]
    fn p4_degenerate_import_not_acceptable(tiny in 1e-9_f64..1e-6) {
        let at = Utc.timestamp_millis_opt(1_590_000_000_000).unwrap();
        prop_assert!(!RawLocation::new(at, tiny, tiny).is_acceptable());
    }
}
