//! Message log service.
//!
//! This module provides [`MessageLog`], the entry point that ties the codec,
//! the bounded store, and pagination together behind two operations:
//! [`push_message`](MessageLog::push_message) and
//! [`get_messages`](MessageLog::get_messages).

use std::sync::Arc;

use common::{ListStorage, create_storage};

use crate::config::Config;
use crate::error::Result;
use crate::model::{Message, Offset, PageRequest};
use crate::range::RetainedWindow;
use crate::store::BoundedLog;

/// A bounded log of short messages addressed by offset.
///
/// Producers append with [`push_message`](Self::push_message) and receive
/// the message's permanent offset. Consumers read pages of recent history
/// with [`get_messages`](Self::get_messages). Only the `capacity` most
/// recent messages are retained; older offsets quietly drop out of reads.
///
/// # Thread Safety
///
/// `MessageLog` is meant to be wrapped in an `Arc` and shared across request
/// handlers. All methods take `&self`.
///
/// # Example
///
/// ```ignore
/// use message_log::{Config, Message, MessageLog, PageRequest};
///
/// let log = MessageLog::open(Config::default()).await?;
/// let offset = log.push_message(&Message::new("alice", "hi")?).await?;
/// let page = log.get_messages(&PageRequest::new(offset, 10)?).await?;
/// ```
pub struct MessageLog {
    store: BoundedLog,
}

impl MessageLog {
    /// Opens the log, creating the storage backend from `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend cannot be initialized, the
    /// capacity is zero, or the stored entries are corrupt.
    pub async fn open(config: Config) -> Result<Self> {
        let storage = create_storage(&config.storage).await?;
        Self::new(storage, config).await
    }

    /// Opens the log over an existing storage handle.
    ///
    /// `config.storage` is ignored; the handle is used as given.
    pub async fn new(storage: Arc<dyn ListStorage>, config: Config) -> Result<Self> {
        let store = BoundedLog::open(storage, config.log_key, config.capacity).await?;
        Ok(Self { store })
    }

    /// Appends a message and returns the offset assigned to it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encoding`](crate::Error::Encoding) if the message
    /// violates its field constraints, or
    /// [`Error::Storage`](crate::Error::Storage) if the backend write fails.
    pub async fn push_message(&self, message: &Message) -> Result<Offset> {
        let payload = message.encode()?;
        let offset = self.store.append(payload).await?;
        tracing::debug!(offset, sender = %message.sender(), "Pushed message");
        Ok(offset)
    }

    /// Returns retained messages with offsets in
    /// `[request.offset, request.offset + request.limit)`, oldest first.
    ///
    /// Requests that start before the oldest retained offset return only
    /// the retained part; requests at or past the next offset return an
    /// empty page.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Corruption`](crate::Error::Corruption) if a stored
    /// entry cannot be decoded, or [`Error::Storage`](crate::Error::Storage)
    /// if the backend read fails.
    pub async fn get_messages(&self, request: &PageRequest) -> Result<Vec<Message>> {
        let entries = self.store.range(request).await?;
        let messages = entries
            .iter()
            .map(|entry| {
                Message::decode(&entry.payload).map_err(|e| {
                    e.into_corruption(format_args!("entry at offset {}", entry.offset))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(
            offset = request.offset(),
            limit = request.limit(),
            returned = messages.len(),
            "Read messages"
        );
        Ok(messages)
    }

    /// Returns the offsets currently retained.
    pub async fn window(&self) -> RetainedWindow {
        self.store.window().await
    }

    /// Maximum number of messages retained.
    pub fn capacity(&self) -> u64 {
        self.store.capacity()
    }

    /// Verifies the storage backend is reachable.
    pub async fn check_storage(&self) -> Result<()> {
        self.store.check_storage().await
    }
}
