pub mod storage;

pub use storage::config::{RedisStorageConfig, StorageConfig};
pub use storage::factory::create_storage;
pub use storage::{ListStorage, StorageError, StorageResult};
