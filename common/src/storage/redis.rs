//! Redis-backed list storage.
//!
//! Lists map directly onto Redis lists: `RPUSH` appends, `LTRIM` with
//! negative indices keeps the newest elements, and `LRANGE` reads by index.
//! [`push_trimmed`](ListStorage::push_trimmed) runs `RPUSH` and `LTRIM`
//! inside a `MULTI`/`EXEC` transaction so no client ever observes the list
//! above its maximum length.

use async_trait::async_trait;
use bytes::Bytes;
use deadpool_redis::{Config as PoolConfig, Connection, Pool, Runtime};
use redis::AsyncCommands;

use super::config::RedisStorageConfig;
use super::{ListStorage, StorageError, StorageResult};

/// Redis implementation of [`ListStorage`] over a deadpool connection pool.
pub struct RedisStorage {
    pool: Pool,
}

impl RedisStorage {
    /// Wraps an existing connection pool.
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Builds a connection pool from configuration and verifies the server
    /// answers `PING`.
    pub async fn connect(config: &RedisStorageConfig) -> StorageResult<Self> {
        let pool = PoolConfig::from_url(config.url())
            .builder()
            .map_err(|e| StorageError::Storage(format!("invalid Redis config: {}", e)))?
            .max_size(config.pool_size)
            .runtime(Runtime::Tokio1)
            .build()
            .map_err(|e| StorageError::Storage(format!("failed to build Redis pool: {}", e)))?;

        let storage = Self::new(pool);
        let mut conn = storage.connection().await?;
        redis::cmd("PING")
            .query_async::<String>(&mut *conn)
            .await
            .map_err(StorageError::from_storage)?;

        tracing::info!(host = %config.host, port = config.port, "Connected to Redis");
        Ok(storage)
    }

    async fn connection(&self) -> StorageResult<Connection> {
        self.pool.get().await.map_err(StorageError::from_storage)
    }
}

/// Converts an element count or index into the signed index Redis expects.
fn to_redis_index(value: u64) -> isize {
    isize::try_from(value).unwrap_or(isize::MAX)
}

/// `LTRIM` bounds that keep the newest `max_len` elements.
///
/// `LTRIM key 0 -1` would keep everything, so an empty retention is
/// expressed as an inverted range, which Redis treats as "remove all".
fn trim_bounds(max_len: u64) -> (isize, isize) {
    if max_len == 0 {
        (1, 0)
    } else {
        (-to_redis_index(max_len), -1)
    }
}

#[async_trait]
impl ListStorage for RedisStorage {
    #[tracing::instrument(level = "trace", skip_all)]
    async fn push(&self, key: &str, value: Bytes) -> StorageResult<u64> {
        let mut conn = self.connection().await?;
        conn.rpush(key, value.as_ref())
            .await
            .map_err(StorageError::from_storage)
    }

    #[tracing::instrument(level = "trace", skip_all)]
    async fn trim(&self, key: &str, max_len: u64) -> StorageResult<()> {
        let (start, stop) = trim_bounds(max_len);
        let mut conn = self.connection().await?;
        conn.ltrim(key, start, stop)
            .await
            .map_err(StorageError::from_storage)
    }

    #[tracing::instrument(level = "trace", skip_all)]
    async fn range(&self, key: &str, start: u64, end: u64) -> StorageResult<Vec<Bytes>> {
        if start >= end {
            return Ok(Vec::new());
        }
        let mut conn = self.connection().await?;
        let values: Vec<Vec<u8>> = conn
            .lrange(key, to_redis_index(start), to_redis_index(end - 1))
            .await
            .map_err(StorageError::from_storage)?;
        Ok(values.into_iter().map(Bytes::from).collect())
    }

    #[tracing::instrument(level = "trace", skip_all)]
    async fn push_trimmed(&self, key: &str, value: Bytes, max_len: u64) -> StorageResult<u64> {
        let (start, stop) = trim_bounds(max_len);
        let mut conn = self.connection().await?;
        let (len,): (u64,) = redis::pipe()
            .atomic()
            .rpush(key, value.as_ref())
            .ltrim(key, start, stop)
            .ignore()
            .query_async(&mut *conn)
            .await
            .map_err(StorageError::from_storage)?;
        Ok(len)
    }
}
