//! In-memory [`LocationRepository`] for tests.

// Each operation holds the lock for its whole body.
#![allow(clippy::significant_drop_tightening)]

use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::error::{Result, StorageError};
use super::LocationRepository;
use crate::location::HashedLocationRecord;

/// Thread-safe, non-persistent repository.
///
/// Only available with the `test-utils` feature. DO NOT use in production:
/// everything is lost when the value is dropped.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    records: Mutex<Vec<HashedLocationRecord>>,
}

impl MemoryRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<HashedLocationRecord>>> {
        self.records
            .lock()
            .map_err(|e| StorageError::Backend(format!("Failed to acquire repository lock: {e}")))
    }
}

impl LocationRepository for MemoryRepository {
    fn insert(&self, record: HashedLocationRecord) -> Result<()> {
        let mut records = self.lock()?;
        if records.iter().any(|existing| existing.id == record.id) {
            return Err(StorageError::DuplicateId(record.id));
        }
        records.push(record);
        Ok(())
    }

    fn get(&self, id: &Uuid) -> Result<Option<HashedLocationRecord>> {
        Ok(self.lock()?.iter().find(|record| record.id == *id).cloned())
    }

    fn append_tokens(&self, id: &Uuid, tokens: &[String]) -> Result<()> {
        let mut records = self.lock()?;
        let record = records
            .iter_mut()
            .find(|record| record.id == *id)
            .ok_or(StorageError::NotFound(*id))?;
        record.append_tokens(tokens.iter().cloned());
        Ok(())
    }

    fn records_since(&self, since: DateTime<Utc>) -> Result<Vec<HashedLocationRecord>> {
        let mut found: Vec<_> = self
            .lock()?
            .iter()
            .filter(|record| record.timestamp >= since)
            .cloned()
            .collect();
        found.sort_by_key(|record| record.timestamp);
        Ok(found)
    }

    fn purge_before(&self, cutoff: DateTime<Utc>) -> Result<usize> {
        let mut records = self.lock()?;
        let before = records.len();
        records.retain(|record| record.timestamp >= cutoff);
        Ok(before - records.len())
    }

    fn len(&self) -> Result<usize> {
        Ok(self.lock()?.len())
    }
}
