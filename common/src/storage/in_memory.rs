use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::RwLock;

use super::{ListStorage, StorageResult};

/// In-memory implementation of [`ListStorage`].
///
/// Every list lives in a `VecDeque` behind a single lock, which makes
/// [`push_trimmed`](ListStorage::push_trimmed) atomic. Data is lost when the
/// process exits; use it for tests and local development.
#[derive(Default)]
pub struct InMemoryStorage {
    lists: RwLock<HashMap<String, VecDeque<Bytes>>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

fn trim_list(list: &mut VecDeque<Bytes>, max_len: u64) {
    let max_len = usize::try_from(max_len).unwrap_or(usize::MAX);
    if list.len() > max_len {
        let excess = list.len() - max_len;
        list.drain(..excess);
    }
}

#[async_trait]
impl ListStorage for InMemoryStorage {
    async fn push(&self, key: &str, value: Bytes) -> StorageResult<u64> {
        let mut lists = self.lists.write().await;
        let list = lists.entry(key.to_string()).or_default();
        list.push_back(value);
        Ok(list.len() as u64)
    }

    async fn trim(&self, key: &str, max_len: u64) -> StorageResult<()> {
        let mut lists = self.lists.write().await;
        if let Some(list) = lists.get_mut(key) {
            trim_list(list, max_len);
        }
        Ok(())
    }

    async fn range(&self, key: &str, start: u64, end: u64) -> StorageResult<Vec<Bytes>> {
        let lists = self.lists.read().await;
        let Some(list) = lists.get(key) else {
            return Ok(Vec::new());
        };

        let len = list.len() as u64;
        let start = start.min(len) as usize;
        let end = end.min(len) as usize;
        if start >= end {
            return Ok(Vec::new());
        }
        Ok(list.range(start..end).cloned().collect())
    }

    async fn push_trimmed(&self, key: &str, value: Bytes, max_len: u64) -> StorageResult<u64> {
        let mut lists = self.lists.write().await;
        let list = lists.entry(key.to_string()).or_default();
        list.push_back(value);
        let len = list.len() as u64;
        trim_list(list, max_len);
        Ok(len)
    }
}
