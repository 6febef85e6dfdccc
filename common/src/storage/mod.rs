//! List-oriented storage abstraction.
//!
//! The message log only needs three primitives from its backend: append to
//! the right of a named list, trim a list to its most recent elements, and
//! read a list by index range. [`ListStorage`] captures exactly those, so a
//! backend can be anything from an in-process map to a Redis server.

pub mod config;
pub mod factory;
pub mod in_memory;
pub mod redis;

use async_trait::async_trait;
use bytes::Bytes;

/// Error type for storage operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// The backend failed or could not be reached.
    Storage(String),
    /// An unexpected condition inside the storage layer itself.
    Internal(String),
}

impl std::error::Error for StorageError {}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::Storage(msg) => write!(f, "Storage error: {}", msg),
            StorageError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl StorageError {
    /// Wraps any displayable backend error as a [`StorageError::Storage`].
    pub fn from_storage(e: impl std::fmt::Display) -> Self {
        StorageError::Storage(e.to_string())
    }
}

/// Result type alias for storage operations.
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Named-list storage backend.
///
/// Lists are addressed by a string key and hold opaque byte values. Index 0
/// is always the oldest retained element.
#[async_trait]
pub trait ListStorage: Send + Sync {
    /// Appends `value` to the right of the list, returning the new length.
    async fn push(&self, key: &str, value: Bytes) -> StorageResult<u64>;

    /// Trims the list so that only the most recent `max_len` elements remain.
    async fn trim(&self, key: &str, max_len: u64) -> StorageResult<()>;

    /// Returns the elements at indices `[start, end)`, oldest first.
    ///
    /// Indices past the end of the list are ignored, so a range that lies
    /// entirely beyond the list yields an empty vector.
    async fn range(&self, key: &str, start: u64, end: u64) -> StorageResult<Vec<Bytes>>;

    /// Appends `value` and trims the list to `max_len` elements.
    ///
    /// Returns the list length after the push and before the trim. The
    /// default implementation issues two separate calls; backends that can
    /// execute the pair atomically should override it.
    async fn push_trimmed(&self, key: &str, value: Bytes, max_len: u64) -> StorageResult<u64> {
        let len = self.push(key, value).await?;
        if len > max_len {
            self.trim(key, max_len).await?;
        }
        Ok(len)
    }
}
