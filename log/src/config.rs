//! Configuration for the message log.

use common::StorageConfig;

/// Name of the backing list when none is configured.
pub const DEFAULT_LOG_KEY: &str = "message-log";

/// Number of most recent messages retained when none is configured.
pub const DEFAULT_CAPACITY: u64 = 1024;

/// Configuration for opening a [`MessageLog`](crate::MessageLog).
///
/// # Example
///
/// ```ignore
/// use message_log::{Config, MessageLog};
/// use common::StorageConfig;
///
/// let config = Config {
///     storage: StorageConfig::InMemory,
///     ..Default::default()
/// };
/// let log = MessageLog::open(config).await?;
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Storage backend configuration.
    ///
    /// See [`StorageConfig`] for the in-memory and Redis options.
    pub storage: StorageConfig,

    /// Key of the list that holds the log in the storage backend.
    pub log_key: String,

    /// Maximum number of entries retained.
    ///
    /// Once the log holds this many entries, each append evicts the oldest.
    /// Must be at least 1.
    pub capacity: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
            log_key: DEFAULT_LOG_KEY.to_string(),
            capacity: DEFAULT_CAPACITY,
        }
    }
}
