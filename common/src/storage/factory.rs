//! Storage factory for creating storage instances from configuration.

use std::sync::Arc;

use super::config::StorageConfig;
use super::in_memory::InMemoryStorage;
use super::redis::RedisStorage;
use super::{ListStorage, StorageResult};

/// Creates a storage instance based on the provided configuration.
///
/// The returned handle is meant to be created once per process and shared;
/// the Redis backend pools its connections internally.
///
/// # Examples
///
/// ```rust,ignore
/// use common::storage::config::StorageConfig;
/// use common::storage::factory::create_storage;
///
/// let storage = create_storage(&StorageConfig::InMemory).await?;
/// ```
pub async fn create_storage(config: &StorageConfig) -> StorageResult<Arc<dyn ListStorage>> {
    match config {
        StorageConfig::InMemory => Ok(Arc::new(InMemoryStorage::new())),
        StorageConfig::Redis(redis_config) => {
            let storage = RedisStorage::connect(redis_config).await?;
            Ok(Arc::new(storage))
        }
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;

    #[tokio::test]
    async fn should_create_in_memory_storage() {
        // given
        let storage = create_storage(&StorageConfig::InMemory).await.unwrap();

        // when
        let len = storage.push("list", Bytes::from("v")).await.unwrap();

        // then
        assert_eq!(len, 1);
    }
}
