//! In-memory reference store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::KvStore;
use super::StoreError;

/// A process-local [`KvStore`] backed by a hash map.
///
/// Used by the test suite and by embedders that do not need durability.
#[derive(Default)]
pub struct MemStore {
    entries: RwLock<HashMap<Vec<u8>, Vec<u8>>>,
}

impl MemStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KvStore for MemStore {
    async fn start(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn stop(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn get(&self, key: &[u8]) -> Result<Vec<u8>, StoreError> {
        self.entries
            .read()
            .await
            .get(key)
            .cloned()
            .ok_or(StoreError::NotExist)
    }

    async fn put(&self, key: &[u8], value: Vec<u8>) -> Result<(), StoreError> {
        self.entries.write().await.insert(key.to_vec(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_get_overwrite() {
        let store = MemStore::new();
        assert!(matches!(store.get(b"a").await, Err(StoreError::NotExist)));

        store.put(b"a", vec![1]).await.unwrap();
        assert_eq!(store.get(b"a").await.unwrap(), vec![1]);

        store.put(b"a", vec![2]).await.unwrap();
        assert_eq!(store.get(b"a").await.unwrap(), vec![2]);
    }
}
