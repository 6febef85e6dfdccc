//! Core data types for the message log.
//!
//! Messages and page requests flow through the public API; [`LogEntry`] is
//! what the store keeps.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Permanent position of a message in the logical, unbounded log.
///
/// Offsets start at 0 and are never reused, even after the entry they name
/// has been evicted.
pub type Offset = u64;

/// Maximum sender length, in characters.
pub const MAX_SENDER_LEN: usize = 128;

/// Maximum content length, in characters.
pub const MAX_CONTENT_LEN: usize = 1024;

/// Default page size for reads that do not specify a limit.
pub const DEFAULT_PAGE_LIMIT: u64 = 10;

/// A short message from a producer.
///
/// Both fields must be non-empty; `sender` holds at most
/// [`MAX_SENDER_LEN`] characters and `content` at most [`MAX_CONTENT_LEN`].
/// Messages built with [`Message::new`] are always valid. Deserialized
/// messages must be checked with [`Message::validate`] before use.
///
/// # Example
///
/// ```
/// use message_log::Message;
///
/// let message = Message::new("alice", "hello").unwrap();
/// assert_eq!(message.sender(), "alice");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    sender: String,
    content: String,
}

impl Message {
    /// Creates a message, rejecting fields outside their length bounds.
    pub fn new(sender: impl Into<String>, content: impl Into<String>) -> Result<Self> {
        let message = Self {
            sender: sender.into(),
            content: content.into(),
        };
        message.validate()?;
        Ok(message)
    }

    /// Builds a message without checking field lengths.
    ///
    /// Only the codec uses this, after it has checked the lengths itself.
    pub(crate) fn new_unchecked(sender: String, content: String) -> Self {
        Self { sender, content }
    }

    pub fn sender(&self) -> &str {
        &self.sender
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Checks both field lengths, returning [`Error::InvalidInput`] on the
    /// first violation.
    pub fn validate(&self) -> Result<()> {
        check_len("sender", &self.sender, MAX_SENDER_LEN).map_err(Error::InvalidInput)?;
        check_len("content", &self.content, MAX_CONTENT_LEN).map_err(Error::InvalidInput)?;
        Ok(())
    }
}

/// Returns a description of the violation if `value` is empty or longer than
/// `max` characters.
pub(crate) fn check_len(field: &str, value: &str, max: usize) -> std::result::Result<(), String> {
    let len = value.chars().count();
    if len == 0 || len > max {
        return Err(format!(
            "{} must be between 1 and {} characters, got {}",
            field, max, len
        ));
    }
    Ok(())
}

/// A read request addressed by absolute offset.
///
/// `offset` is a position in the logical log, not an index into whatever
/// the store currently retains. `limit` is at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    offset: Offset,
    limit: u64,
}

impl PageRequest {
    /// Creates a page request, rejecting a zero `limit`.
    pub fn new(offset: Offset, limit: u64) -> Result<Self> {
        if limit == 0 {
            return Err(Error::InvalidInput("limit must be at least 1".to_string()));
        }
        Ok(Self { offset, limit })
    }

    pub fn offset(&self) -> Offset {
        self.offset
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

/// An entry held by the bounded log store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// The offset assigned when the entry was appended.
    pub offset: Offset,

    /// The encoded message.
    pub payload: Bytes,
}
