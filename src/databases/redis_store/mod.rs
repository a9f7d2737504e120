//! Networked backend on top of a Redis-compatible server.
//!
//! A bucket is one server-side hash whose key is the bucket name; a record is
//! one field of that hash. Lists are native server lists. Every operation is
//! a single command on one connection: there is no client-side transaction,
//! no retry, and calls from different clients may interleave freely.
//!
//! Because hashes appear on first write and vanish with `DEL`, creating a
//! bucket is a no-op and deleting an absent one succeeds.
//!
//! ```
//! use bucket_store::databases::redis_store::{MemoryServer, RedisStore};
//! use bucket_store::BucketStore;
//!
//! let server = MemoryServer::new();
//! let store = RedisStore::with_client(server.connect(), "memory", &["users"]).unwrap();
//!
//! store.save_to_list("recent", "alice", true).unwrap();
//! store.save_to_list("recent", "bob", false).unwrap();
//! assert_eq!(store.get_all_in_list("recent").unwrap(), vec!["alice", "bob"]);
//! ```

use crate::error::{BackendError, StoreError, StoreResult};
use crate::traits::bucket_store::{provision_buckets, validate_bucket_name};
use crate::traits::{Backend, BucketStore};
use log::{debug, trace};
use std::sync::{Mutex, PoisonError};

pub mod commands;
pub mod memory;

pub use commands::RemoteCommands;
pub use memory::{MemoryConnection, MemoryServer};

/// Store whose buckets are hashes on a remote server reached through `C`.
pub struct RedisStore<C: RemoteCommands> {
    // A connection is a single request/response stream and needs `&mut`.
    // A command that panicked leaves the stream in an unknown state, so a
    // poisoned lock fails every later command until the store is closed.
    conn: Mutex<Option<C>>,
    address: String,
}

#[cfg(feature = "networked")]
impl RedisStore<redis::Connection> {
    /// Connect to `config.host` on the fixed port and database, then provision `buckets`.
    ///
    /// ## Errors
    ///
    /// [`StoreError::Connection`] when the server cannot be reached or
    /// rejects the credential.
    pub fn open(config: crate::config::NetworkedConfig, buckets: &[&str]) -> StoreResult<Self> {
        let start = std::time::Instant::now();
        let address = config.address();
        debug!("RedisStore: Connecting to {}", address);

        let client = redis::Client::open(config.connection_info())
            .map_err(|e| StoreError::Connection(BackendError::Redis(e)))?;
        let conn = client
            .get_connection()
            .map_err(|e| StoreError::Connection(BackendError::Redis(e)))?;

        let store = Self::with_client(conn, address, buckets)?;
        debug!("RedisStore: Connected in {:?}", start.elapsed());
        Ok(store)
    }
}

impl<C: RemoteCommands> RedisStore<C> {
    /// Wrap an already established connection.
    pub fn with_client(client: C, address: impl Into<String>, buckets: &[&str]) -> StoreResult<Self> {
        let store = RedisStore {
            conn: Mutex::new(Some(client)),
            address: address.into(),
        };
        provision_buckets(&store, buckets)?;
        Ok(store)
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    fn with_conn<R>(&self, command: &str, f: impl FnOnce(&mut C) -> StoreResult<R>) -> StoreResult<R> {
        let mut guard = self
            .conn
            .lock()
            .map_err(|_| StoreError::Operation(BackendError::Poisoned))?;
        let conn = guard.as_mut().ok_or(StoreError::Closed)?;
        trace!("RedisStore: {} on {}", command, self.address);
        f(conn)
    }
}

impl<C: RemoteCommands> BucketStore for RedisStore<C> {
    fn backend(&self) -> Backend {
        Backend::Networked
    }

    fn close(&mut self) -> StoreResult<()> {
        let conn = self
            .conn
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .ok_or(StoreError::Closed)?;
        drop(conn);
        debug!("RedisStore: Closed connection to {}", self.address);
        Ok(())
    }

    fn create_bucket(&self, name: &str) -> StoreResult<bool> {
        validate_bucket_name(name)?;
        // Hashes come into existence on first write.
        self.with_conn("create_bucket", |_| Ok(true))
    }

    fn delete_bucket(&self, name: &str) -> StoreResult<()> {
        validate_bucket_name(name)?;
        self.with_conn("DEL", |conn| conn.delete_key(name))
    }

    fn update(&self, bucket: &str, key: &[u8], value: &[u8]) -> StoreResult<()> {
        validate_bucket_name(bucket)?;
        self.with_conn("HSET", |conn| conn.hash_set(bucket, key, value))
    }

    fn lookup(&self, bucket: &str, key: &[u8]) -> StoreResult<Option<Vec<u8>>> {
        validate_bucket_name(bucket)?;
        self.with_conn("HGET", |conn| conn.hash_get(bucket, key))
    }

    fn entries(&self, bucket: &str) -> StoreResult<Vec<(Vec<u8>, Vec<u8>)>> {
        validate_bucket_name(bucket)?;
        self.with_conn("HGETALL", |conn| conn.hash_get_all(bucket))
    }

    fn delete(&self, bucket: &str, key: &[u8]) -> StoreResult<()> {
        validate_bucket_name(bucket)?;
        self.with_conn("HDEL", |conn| conn.hash_delete(bucket, key))
    }

    fn supports_lists(&self) -> bool {
        true
    }

    fn save_to_list(&self, list: &str, value: &str, insert_at_front: bool) -> StoreResult<()> {
        let command = if insert_at_front { "LPUSH" } else { "RPUSH" };
        self.with_conn(command, |conn| conn.list_push(list, value, insert_at_front))
    }

    fn get_all_in_list(&self, list: &str) -> StoreResult<Vec<String>> {
        self.with_conn("LRANGE", |conn| conn.list_range(list))
    }
}

impl<C: RemoteCommands> std::fmt::Debug for RedisStore<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStore")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}
