//! Location module.
//!
//! Everything that works on coordinates and timestamps before hashing:
//! - Raw and persisted location types
//! - Circle sampling around a position to absorb GPS jitter
//! - Geohash encoding
//! - Time window quantization
//! - The nearby-distance test
//! - Import/export of sharable location history
//!
//! # Example Usage
//!
//! ```
//! use geotrace_core::location::{is_nearby, location_to_geohash, time_windows, GeoCircle};
//!
//! let points = GeoCircle::default_radius().sample(37.7749, -122.4194);
//! let cells: Vec<String> = points
//!     .iter()
//!     .map(|(lat, lon)| location_to_geohash(*lat, *lon, 8))
//!     .collect();
//! assert!(cells.contains(&"9q8yyk8y".to_string()));
//!
//! let windows = time_windows(1_590_000_000_000, 300_000);
//! assert_eq!(windows.late - windows.early, 300_000);
//!
//! assert!(is_nearby(37.7749, -122.4194, 37.77495, -122.41945));
//! ```

pub mod geo;
pub mod import;
pub mod proximity;
pub mod time;
pub mod types;

pub use geo::{geohash_to_location, location_to_geohash, GeoCircle, GeoOffset};
pub use import::import_records;
pub use proximity::{is_nearby, spherical_distance_m};
pub use time::{time_windows, TimeWindows, WindowRounding};
pub use types::{HashedLocationRecord, LocationSource, RawLocation, SharableLocation};
