//! High-level entry point tying the location and token modules together.

use std::time::Instant;

use chrono::{DateTime, Utc};
use log::debug;
use zeroize::Zeroizing;

use crate::location::{HashedLocationRecord, LocationSource, RawLocation};
use crate::token::{Result, TokenAssembler, TokenHasher, TokenSettings};

/// Core interface for location tokenization.
///
/// Holds validated settings and the assembler/hasher built from them. It is
/// immutable and `Send + Sync`, so one instance can be shared by every
/// worker that hashes locations.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use geotrace_core::location::RawLocation;
/// use geotrace_core::GeoTraceCore;
///
/// let core = GeoTraceCore::new();
/// let at = Utc.timestamp_millis_opt(1_590_000_000_000).unwrap();
///
/// let tokens = core
///     .hash_tokens(&RawLocation::new(at, 37.7749, -122.4194))
///     .unwrap()
///     .unwrap();
/// assert!(tokens.contains(&"e0a9052ac6f3e604".to_string()));
///
/// // Unacceptable input is skipped, not an error.
/// assert!(core.hash_tokens(&RawLocation::new(at, 0.0, 0.0)).unwrap().is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct GeoTraceCore {
    settings: TokenSettings,
    assembler: TokenAssembler,
    hasher: TokenHasher,
}

impl GeoTraceCore {
    /// Creates a core with the production token format.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a core with custom settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings fail validation.
    pub fn with_settings(settings: TokenSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            assembler: TokenAssembler::new(&settings),
            hasher: TokenHasher::new(settings.hash_params.clone())?,
            settings,
        })
    }

    /// The settings in use.
    #[must_use]
    pub const fn settings(&self) -> &TokenSettings {
        &self.settings
    }

    /// Plaintext token candidates for `location`, before hashing.
    ///
    /// These strings reveal the location; don't persist or log them.
    #[must_use]
    pub fn token_candidates(&self, location: &RawLocation) -> Vec<String> {
        self.assembler.assemble(location)
    }

    /// Hashed tokens for `location`.
    ///
    /// Returns `Ok(None)` if the location is not acceptable.
    ///
    /// # Errors
    ///
    /// Returns an error if key derivation fails. That is not an input problem
    /// and retrying the same location will fail the same way.
    pub fn hash_tokens(&self, location: &RawLocation) -> Result<Option<Vec<String>>> {
        if !location.is_acceptable() {
            debug!("Skipping unacceptable location");
            return Ok(None);
        }

        let candidates = Zeroizing::new(self.assembler.assemble(location));
        let start = Instant::now();
        let tokens = self.hasher.hash_all(candidates.as_slice())?;
        debug!(
            "Hashed {} tokens in {:.4} seconds",
            tokens.len(),
            start.elapsed().as_secs_f64()
        );

        Ok(Some(tokens))
    }

    /// Builds a record for `location`, hashing it if `hash` is set.
    ///
    /// Returns `Ok(None)` if the location is not acceptable. With `hash`
    /// unset the record is stored without tokens, for a later batch to fill in.
    ///
    /// # Errors
    ///
    /// Returns an error if key derivation fails.
    pub fn record_location(
        &self,
        location: &RawLocation,
        hash: bool,
    ) -> Result<Option<HashedLocationRecord>> {
        if !location.is_acceptable() {
            debug!("Not recording unacceptable location");
            return Ok(None);
        }
        let Some(mut record) = HashedLocationRecord::from_raw(location) else {
            return Ok(None);
        };

        if hash {
            if let Some(tokens) = self.hash_tokens(location)? {
                record.append_tokens(tokens);
            }
        }

        Ok(Some(record))
    }

    /// Records a position the application synthesized rather than sensed.
    ///
    /// # Errors
    ///
    /// Returns an error if key derivation fails.
    pub fn record_assumed(
        &self,
        timestamp: DateTime<Utc>,
        latitude: f64,
        longitude: f64,
        hash: bool,
    ) -> Result<Option<HashedLocationRecord>> {
        let location =
            RawLocation::new(timestamp, latitude, longitude).with_source(LocationSource::Assumed);
        self.record_location(&location, hash)
    }

    /// Hashes a batch of locations into records, one result per input.
    ///
    /// Items are independent, so with the `parallel` feature they run on the
    /// rayon thread pool. Output order always matches input order.
    ///
    /// # Errors
    ///
    /// Returns the first key-derivation failure.
    pub fn hash_batch(
        &self,
        locations: &[RawLocation],
    ) -> Result<Vec<Option<HashedLocationRecord>>> {
        let start = Instant::now();

        #[cfg(feature = "parallel")]
        let records: Result<Vec<_>> = {
            use rayon::prelude::*;
            locations
                .par_iter()
                .map(|location| self.record_location(location, true))
                .collect()
        };

        #[cfg(not(feature = "parallel"))]
        let records: Result<Vec<_>> = locations
            .iter()
            .map(|location| self.record_location(location, true))
            .collect();

        debug!(
            "Hashed batch of {} locations in {:.4} seconds",
            locations.len(),
            start.elapsed().as_secs_f64()
        );
        records
    }
}
