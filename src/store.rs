//! Backend-agnostic store handle.
//!
//! [`Store::open`] is the only place a backend is chosen. The returned handle
//! implements [`BucketStore`] by forwarding to whichever backend the
//! [`Locator`] selected.

use crate::config::Locator;
use crate::error::{StoreError, StoreResult};
use crate::traits::{Backend, BucketStore};
use std::collections::HashMap;

pub struct Store {
    inner: Box<dyn BucketStore>,
}

impl Store {
    /// Open the backend described by `locator` and create each of `buckets`.
    ///
    /// ```
    /// use bucket_store::config::EmbeddedConfig;
    /// use bucket_store::{BucketStore, Store};
    ///
    /// let dir = tempfile::tempdir().unwrap();
    /// let mut store = Store::open(EmbeddedConfig::new(dir.path().join("s.redb")), &["users"]).unwrap();
    /// store.save("users", b"alice", b"30").unwrap();
    /// assert_eq!(store.get_all("users").unwrap(), vec![b"30".to_vec()]);
    /// store.close().unwrap();
    /// ```
    pub fn open(locator: impl Into<Locator>, buckets: &[&str]) -> StoreResult<Self> {
        match locator.into() {
            #[cfg(feature = "embedded")]
            Locator::Embedded(config) => Ok(Self::from_backend(
                crate::databases::redb_store::RedbStore::open(config, buckets)?,
            )),
            #[cfg(feature = "networked")]
            Locator::Networked(config) => Ok(Self::from_backend(
                crate::databases::redis_store::RedisStore::open(config, buckets)?,
            )),
            #[allow(unreachable_patterns)]
            other => Err(StoreError::Unsupported {
                operation: "open",
                backend: other.backend(),
            }),
        }
    }

    /// Wrap an already opened backend.
    pub fn from_backend<S: BucketStore + 'static>(backend: S) -> Self {
        Store {
            inner: Box::new(backend),
        }
    }
}

impl BucketStore for Store {
    fn backend(&self) -> Backend {
        self.inner.backend()
    }

    fn close(&mut self) -> StoreResult<()> {
        self.inner.close()
    }

    fn create_bucket(&self, name: &str) -> StoreResult<bool> {
        self.inner.create_bucket(name)
    }

    fn delete_bucket(&self, name: &str) -> StoreResult<()> {
        self.inner.delete_bucket(name)
    }

    fn empty_bucket(&self, name: &str) -> StoreResult<()> {
        self.inner.empty_bucket(name)
    }

    fn update(&self, bucket: &str, key: &[u8], value: &[u8]) -> StoreResult<()> {
        self.inner.update(bucket, key, value)
    }

    fn save(&self, bucket: &str, key: &[u8], value: &[u8]) -> StoreResult<()> {
        self.inner.save(bucket, key, value)
    }

    fn lookup(&self, bucket: &str, key: &[u8]) -> StoreResult<Option<Vec<u8>>> {
        self.inner.lookup(bucket, key)
    }

    fn get(&self, bucket: &str, key: &[u8]) -> StoreResult<Vec<u8>> {
        self.inner.get(bucket, key)
    }

    fn entries(&self, bucket: &str) -> StoreResult<Vec<(Vec<u8>, Vec<u8>)>> {
        self.inner.entries(bucket)
    }

    fn get_all(&self, bucket: &str) -> StoreResult<Vec<Vec<u8>>> {
        self.inner.get_all(bucket)
    }

    fn get_all_with_keys(&self, bucket: &str) -> StoreResult<HashMap<Vec<u8>, Vec<u8>>> {
        self.inner.get_all_with_keys(bucket)
    }

    fn delete(&self, bucket: &str, key: &[u8]) -> StoreResult<()> {
        self.inner.delete(bucket, key)
    }

    fn supports_lists(&self) -> bool {
        self.inner.supports_lists()
    }

    fn save_to_list(&self, list: &str, value: &str, insert_at_front: bool) -> StoreResult<()> {
        self.inner.save_to_list(list, value, insert_at_front)
    }

    fn get_all_in_list(&self, list: &str) -> StoreResult<Vec<String>> {
        self.inner.get_all_in_list(list)
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("backend", &self.inner.backend())
            .finish_non_exhaustive()
    }
}
