//! Error types for message log operations.
//!
//! This module defines [`Error`], the primary error type for all log
//! operations, along with a convenient [`Result`] type alias.

use common::StorageError;

/// Error type for message log operations.
///
/// Every failure path produces a distinct variant so the HTTP layer can map
/// it to the right status without inspecting messages.
///
/// # Error Categories
///
/// - [`InvalidInput`](Error::InvalidInput): the caller sent a malformed or
///   out-of-range request. Never reaches storage.
/// - [`Encoding`](Error::Encoding): a message could not be encoded because it
///   violates field constraints the boundary should already have enforced.
/// - [`Decoding`](Error::Decoding): bytes are not a well-formed encoding.
/// - [`Corruption`](Error::Corruption): the log holds data it did not write
///   itself. Retrying will not help.
/// - [`Storage`](Error::Storage): the storage backend is unreachable or
///   failing. Callers may retry with backoff.
/// - [`Internal`](Error::Internal): unexpected internal errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("Decoding error: {0}")]
    Decoding(String),

    #[error("Log corruption: {0}")]
    Corruption(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Escalates a decoding failure on stored data to [`Error::Corruption`],
    /// prefixing the message with `context`.
    ///
    /// Other variants pass through unchanged.
    pub(crate) fn into_corruption(self, context: impl std::fmt::Display) -> Self {
        match self {
            Error::Decoding(msg) => Error::Corruption(format!("{}: {}", context, msg)),
            other => other,
        }
    }
}

impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Storage(msg) => Error::Storage(msg),
            StorageError::Internal(msg) => Error::Internal(msg),
        }
    }
}

/// Result type alias for message log operations.
pub type Result<T> = std::result::Result<T, Error>;
