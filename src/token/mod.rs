//! Token derivation.
//!
//! Turns a [`RawLocation`](crate::location::RawLocation) into opaque tokens
//! that can be published and compared without revealing where or when the
//! location was recorded.
//!
//! # Architecture
//!
//! ```text
//! RawLocation
//!     ├── GeoCircle::sample        (9 points, 10 m around the fix)
//!     ├── location_to_geohash      (precision 8, deduplicated, sorted)
//!     └── time_windows             (5 minute buckets, early + late)
//!              ↓
//!     TokenAssembler               ("9q8yyk8y1590000000000", ...)
//!              ↓
//!     TokenHasher                  (scrypt N=4096 r=8 p=1, 8 bytes)
//!              ↓
//!     ["e0a9052ac6f3e604", ...]
//! ```

pub mod assembler;
mod error;
pub mod hasher;
pub mod matching;
pub mod settings;

pub use assembler::TokenAssembler;
pub use error::{Result, TokenError};
pub use hasher::{HashParams, TokenFormat, TokenHasher};
pub use settings::TokenSettings;
