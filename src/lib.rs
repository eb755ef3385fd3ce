//! GeoTrace Core Library
//!
//! Turns location history into anonymous tokens for exposure notification.
//! Each recorded fix becomes a handful of short scrypt hashes over
//! `<geohash><time window>` strings. Two devices that were near each other
//! at about the same time share at least one token, without either side
//! publishing where it was.
//!
//! # Modules
//!
//! - [`location`]: raw fixes, stored records, geohash sampling, time windows,
//!   the proximity test and the interchange format
//! - [`token`]: candidate assembly, hashing and constant-time matching
//! - [`storage`]: the repository seam for persisting records

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![deny(unsafe_code)]

mod api;
pub mod location;
pub mod storage;
pub mod token;

pub use api::GeoTraceCore;
