//! Error types for location storage.

use thiserror::Error;
use uuid::Uuid;

/// Error type for repository operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// No record with this id.
    #[error("Location record not found: {0}")]
    NotFound(Uuid),

    /// A record with this id is already stored.
    #[error("Location record already exists: {0}")]
    DuplicateId(Uuid),

    /// The backing store failed.
    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Result type alias for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;
