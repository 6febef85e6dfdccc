//! Message Log - a bounded, offset-addressed log of short messages.
//!
//! Producers append `{sender, content}` messages and receive a permanent
//! offset. Consumers read pages of the most recent messages by absolute
//! offset. Only a fixed number of recent messages is retained; older ones
//! are evicted oldest-first, but offsets are never reused.
//!
//! # Architecture
//!
//! The log lives in a single named list in an external store (Redis in
//! production, an in-memory map for tests). Each append pushes one framed
//! entry and trims the list to the configured capacity. The store assigns
//! offsets under a lock and embeds them in each entry, so a restarted
//! process picks up where the last one stopped.
//!
//! # Key Concepts
//!
//! - **MessageLog**: The main entry point providing append and paged reads.
//! - **Offset**: A message's position in the full, unbounded log.
//! - **Retained window**: The offsets still held by the store, at most
//!   `capacity` of them.
//!
//! # Example
//!
//! ```ignore
//! use message_log::{Config, Message, MessageLog, PageRequest};
//! use common::StorageConfig;
//!
//! let log = MessageLog::open(Config {
//!     storage: StorageConfig::InMemory,
//!     ..Default::default()
//! })
//! .await?;
//!
//! let offset = log.push_message(&Message::new("alice", "hello")?).await?;
//! for message in log.get_messages(&PageRequest::new(0, 10)?).await? {
//!     println!("{}: {}", message.sender(), message.content());
//! }
//! ```

mod config;
mod error;
mod log;
mod model;
mod range;
mod serde;
#[cfg(feature = "http-server")]
pub mod server;
mod store;

pub use config::{Config, DEFAULT_CAPACITY, DEFAULT_LOG_KEY};
pub use error::{Error, Result};
pub use log::MessageLog;
pub use model::{
    DEFAULT_PAGE_LIMIT, LogEntry, MAX_CONTENT_LEN, MAX_SENDER_LEN, Message, Offset, PageRequest,
};
pub use range::RetainedWindow;
