//! Storage interface for hashed location records.
//!
//! This crate does not persist anything itself. The embedding application
//! owns the database and implements [`LocationRepository`] over it; the
//! pipeline only hands it finished [`HashedLocationRecord`] values.
//!
//! # Lifecycle
//!
//! ```text
//! capture/import ──insert──▶ record ──append_tokens──▶ record (tokens filled)
//!                                                         │
//!                                   purge_before(cutoff) ◀┘ retention
//! ```

mod error;
#[cfg(any(test, feature = "test-utils"))]
mod memory;

pub use error::{Result, StorageError};
#[cfg(any(test, feature = "test-utils"))]
pub use memory::MemoryRepository;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::location::{HashedLocationRecord, SharableLocation};

/// Persistence for [`HashedLocationRecord`]s.
///
/// Records are immutable once inserted, except that tokens may be appended
/// (e.g. when hashing is deferred to a background batch).
pub trait LocationRepository: Send + Sync {
    /// Stores a new record.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::DuplicateId`] if the id is taken.
    fn insert(&self, record: HashedLocationRecord) -> Result<()>;

    /// Looks up a record by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn get(&self, id: &Uuid) -> Result<Option<HashedLocationRecord>>;

    /// Appends tokens to an existing record, skipping ones already present.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotFound`] if there is no such record.
    fn append_tokens(&self, id: &Uuid, tokens: &[String]) -> Result<()>;

    /// All records observed at or after `since`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn records_since(&self, since: DateTime<Utc>) -> Result<Vec<HashedLocationRecord>>;

    /// Deletes records observed before `cutoff` and returns how many were removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn purge_before(&self, cutoff: DateTime<Utc>) -> Result<usize>;

    /// Number of stored records.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn len(&self) -> Result<usize>;

    /// Whether the repository holds no records.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

/// Sharable export of every record observed at or after `since`.
///
/// # Errors
///
/// Returns an error if the repository fails.
pub fn export_since<R: LocationRepository + ?Sized>(
    repository: &R,
    since: DateTime<Utc>,
) -> Result<Vec<SharableLocation>> {
    Ok(repository
        .records_since(since)?
        .iter()
        .map(HashedLocationRecord::to_sharable)
        .collect())
}
