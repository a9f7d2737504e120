// Common test utilities and helpers
#![allow(dead_code)]

#[cfg(feature = "embedded")]
use bucket_store::databases::redb_store::RedbStore;
use bucket_store::databases::redis_store::{MemoryConnection, MemoryServer, RedisStore};
use bucket_store::{Backend, Store};
use tempfile::TempDir;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[cfg(feature = "embedded")]
/// Embedded store in a fresh temporary directory. Keep the `TempDir` alive.
pub fn embedded_store(buckets: &[&str]) -> (RedbStore, TempDir) {
    init_logging();
    let dir = TempDir::new().unwrap();
    let store = RedbStore::at_path(dir.path().join("test.redb"), buckets).unwrap();
    (store, dir)
}

/// Networked store connected to its own in-memory server.
pub fn networked_store(buckets: &[&str]) -> (RedisStore<MemoryConnection>, MemoryServer) {
    init_logging();
    let server = MemoryServer::new();
    let store = RedisStore::with_client(server.connect(), "memory", buckets).unwrap();
    (store, server)
}

/// A backend-agnostic store plus whatever must outlive it.
pub struct Fixture {
    pub store: Store,
    pub server: Option<MemoryServer>,
    _dir: Option<TempDir>,
}

impl Fixture {
    pub fn backend(&self) -> Backend {
        bucket_store::BucketStore::backend(&self.store)
    }
}

#[cfg(feature = "embedded")]
/// One fixture per backend, both provisioned with `buckets`.
pub fn both_backends(buckets: &[&str]) -> Vec<Fixture> {
    let (embedded, dir) = embedded_store(buckets);
    let (networked, server) = networked_store(buckets);
    vec![
        Fixture {
            store: Store::from_backend(embedded),
            server: None,
            _dir: Some(dir),
        },
        Fixture {
            store: Store::from_backend(networked),
            server: Some(server),
            _dir: None,
        },
    ]
}
