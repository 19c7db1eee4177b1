//! Key-value persistence seam for committed election results.
//!
//! The committee never talks to a concrete backend directly: it owns an
//! `Arc<dyn KvStore>` and addresses everything through 8-byte little-endian
//! height keys inside the `electionNS` namespace. [`MemStore`] is the
//! reference implementation used by tests and embedders without a durable
//! backend.

use async_trait::async_trait;
use thiserror::Error;

pub mod memory;

pub use memory::MemStore;

/// Namespace all committee records are stored under.
pub const NAMESPACE: &str = "electionNS";

/// Reserved metadata key holding the next height to fetch.
pub const NEXT_HEIGHT_KEY: &[u8] = b"NextHeight";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("not exist in store")]
    NotExist,

    #[error("store backend error: {0}")]
    Backend(String),
}

/// Contract for the key-value backend owned by the committee.
#[async_trait]
pub trait KvStore: Send + Sync {
    async fn start(&self) -> Result<(), StoreError>;

    async fn stop(&self) -> Result<(), StoreError>;

    /// Returns the value under `key`, or [`StoreError::NotExist`].
    async fn get(&self, key: &[u8]) -> Result<Vec<u8>, StoreError>;

    async fn put(&self, key: &[u8], value: Vec<u8>) -> Result<(), StoreError>;
}

#[async_trait]
impl<S: KvStore + ?Sized> KvStore for std::sync::Arc<S> {
    async fn start(&self) -> Result<(), StoreError> {
        (**self).start().await
    }

    async fn stop(&self) -> Result<(), StoreError> {
        (**self).stop().await
    }

    async fn get(&self, key: &[u8]) -> Result<Vec<u8>, StoreError> {
        (**self).get(key).await
    }

    async fn put(&self, key: &[u8], value: Vec<u8>) -> Result<(), StoreError> {
        (**self).put(key, value).await
    }
}

/// Wraps a store so every key is prefixed with a namespace.
pub struct NamespacedStore<S> {
    namespace: Vec<u8>,
    inner: S,
}

impl<S> NamespacedStore<S> {
    pub fn new(namespace: &str, inner: S) -> Self {
        Self {
            namespace: namespace.as_bytes().to_vec(),
            inner,
        }
    }

    fn key(&self, key: &[u8]) -> Vec<u8> {
        let mut namespaced = Vec::with_capacity(self.namespace.len() + 1 + key.len());
        namespaced.extend_from_slice(&self.namespace);
        namespaced.push(b'.');
        namespaced.extend_from_slice(key);
        namespaced
    }
}

#[async_trait]
impl<S: KvStore> KvStore for NamespacedStore<S> {
    async fn start(&self) -> Result<(), StoreError> {
        self.inner.start().await
    }

    async fn stop(&self) -> Result<(), StoreError> {
        self.inner.stop().await
    }

    async fn get(&self, key: &[u8]) -> Result<Vec<u8>, StoreError> {
        self.inner.get(&self.key(key)).await
    }

    async fn put(&self, key: &[u8], value: Vec<u8>) -> Result<(), StoreError> {
        self.inner.put(&self.key(key), value).await
    }
}
