//! In-memory store backed by moka.
//!
//! This layer wraps `moka::future::Cache` to provide an async-safe,
//! lock-free in-memory store with automatic LRU eviction. It sits in
//! front of the durable disk layer: hot entries are served from here
//! without touching the filesystem.
//!
//! # Why moka?
//!
//! - Lock-free reads (common case)
//! - Concurrent writes without blocking
//! - Automatic LRU eviction without explicit locking
//! - Memory-bounded with configurable limits
//! - Designed for async contexts

use moka::future::Cache as MokaCache;

use super::traits::{BoxFuture, KeyValueStore, StoreError};

/// Default size budget for the memory layer (64 MB).
///
/// A full base-stat dataset is a few hundred kilobytes of JSON, so the
/// default never evicts in practice; the bound exists to keep the layer
/// well-behaved if it is ever pointed at larger payloads.
pub const DEFAULT_MEMORY_SIZE_BYTES: u64 = 64 * 1024 * 1024;

/// In-memory key-value store with byte-weighted LRU eviction.
pub struct MemoryStore {
    cache: MokaCache<String, Vec<u8>>,
}

impl MemoryStore {
    /// Create a memory store bounded to `max_size_bytes` of values.
    pub fn new(max_size_bytes: u64) -> Self {
        let cache = MokaCache::builder()
            // Weight each entry by its data size
            .weigher(|_key: &String, value: &Vec<u8>| -> u32 {
                value.len().min(u32::MAX as usize) as u32
            })
            .max_capacity(max_size_bytes)
            .build();

        Self { cache }
    }

    /// Current number of entries.
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(DEFAULT_MEMORY_SIZE_BYTES)
    }
}

impl KeyValueStore for MemoryStore {
    fn set(&self, key: &str, value: Vec<u8>) -> BoxFuture<'_, Result<(), StoreError>> {
        let key = key.to_string();
        Box::pin(async move {
            self.cache.insert(key, value).await;
            Ok(())
        })
    }

    fn get(&self, key: &str) -> BoxFuture<'_, Result<Option<Vec<u8>>, StoreError>> {
        let key = key.to_string();
        Box::pin(async move { Ok(self.cache.get(&key).await) })
    }

    fn delete(&self, key: &str) -> BoxFuture<'_, Result<bool, StoreError>> {
        let key = key.to_string();
        Box::pin(async move {
            let existed = self.cache.contains_key(&key);
            self.cache.remove(&key).await;
            Ok(existed)
        })
    }

    fn contains(&self, key: &str) -> BoxFuture<'_, Result<bool, StoreError>> {
        let key = key.to_string();
        Box::pin(async move { Ok(self.cache.contains_key(&key)) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_and_get() {
        let store = MemoryStore::new(1_000_000);

        store.set("key1", vec![1, 2, 3]).await.unwrap();

        let value = store.get("key1").await.unwrap();
        assert_eq!(value, Some(vec![1, 2, 3]));
    }

    #[tokio::test]
    async fn test_get_missing() {
        let store = MemoryStore::new(1_000_000);

        let value = store.get("nonexistent").await.unwrap();
        assert!(value.is_none());
    }

    #[tokio::test]
    async fn test_delete() {
        let store = MemoryStore::new(1_000_000);

        store.set("key1", vec![1]).await.unwrap();
        assert!(store.delete("key1").await.unwrap());
        assert!(!store.delete("key1").await.unwrap());
        assert!(!store.contains("key1").await.unwrap());
    }

    #[tokio::test]
    async fn test_contains() {
        let store = MemoryStore::new(1_000_000);

        assert!(!store.contains("key1").await.unwrap());
        store.set("key1", vec![1]).await.unwrap();
        assert!(store.contains("key1").await.unwrap());
    }

    #[tokio::test]
    async fn test_replace_existing() {
        let store = MemoryStore::new(1_000_000);

        store.set("key1", vec![1, 2, 3]).await.unwrap();
        store.set("key1", vec![4, 5, 6, 7]).await.unwrap();

        let value = store.get("key1").await.unwrap();
        assert_eq!(value, Some(vec![4, 5, 6, 7]));
    }
}
