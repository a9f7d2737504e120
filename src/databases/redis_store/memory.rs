//! In-process stand-in for a Redis server.
//!
//! [`MemoryServer`] keeps hashes and lists in one shared keyspace, just as
//! Redis does, and hands out [`MemoryConnection`]s that implement
//! [`RemoteCommands`]. Several connections to one server behave like several
//! clients of one Redis instance, which makes interleavings observable in
//! tests. Hash fields live in a `HashMap`, so `HGETALL` order is unspecified
//! here too.

use super::commands::RemoteCommands;
use crate::error::{BackendError, StoreError, StoreResult};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone)]
enum RedisValue {
    Hash(HashMap<Vec<u8>, Vec<u8>>),
    List(VecDeque<String>),
}

impl RedisValue {
    fn type_name(&self) -> &'static str {
        match self {
            RedisValue::Hash(_) => "hash",
            RedisValue::List(_) => "list",
        }
    }
}

#[derive(Debug, Default)]
struct ServerState {
    keys: Mutex<HashMap<String, RedisValue>>,
    down: AtomicBool,
}

/// Shared in-memory keyspace.
#[derive(Debug, Clone, Default)]
pub struct MemoryServer {
    state: Arc<ServerState>,
}

impl MemoryServer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new client connection to this server.
    pub fn connect(&self) -> MemoryConnection {
        MemoryConnection {
            state: Arc::clone(&self.state),
        }
    }

    /// Make every connection fail as if the server went away.
    pub fn shutdown(&self) {
        self.state.down.store(true, Ordering::SeqCst);
    }

    pub fn restart(&self) {
        self.state.down.store(false, Ordering::SeqCst);
    }

    /// Number of top-level keys (hashes plus lists).
    pub fn key_count(&self) -> usize {
        self.keys().len()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.keys().contains_key(key)
    }

    fn keys(&self) -> MutexGuard<'_, HashMap<String, RedisValue>> {
        self.state.keys.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// One client connection to a [`MemoryServer`].
#[derive(Debug)]
pub struct MemoryConnection {
    state: Arc<ServerState>,
}

impl MemoryConnection {
    fn keyspace(&self) -> StoreResult<MutexGuard<'_, HashMap<String, RedisValue>>> {
        if self.state.down.load(Ordering::SeqCst) {
            return Err(StoreError::Connection(BackendError::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "connection reset by peer",
            ))));
        }
        self.state
            .keys
            .lock()
            .map_err(|_| StoreError::Operation(BackendError::Poisoned))
    }
}

fn wrong_type(found: &RedisValue) -> StoreError {
    StoreError::Operation(BackendError::Reply(format!(
        "WRONGTYPE Operation against a key holding the wrong kind of value ({})",
        found.type_name()
    )))
}

fn as_hash<'a>(
    keys: &'a HashMap<String, RedisValue>,
    key: &str,
) -> StoreResult<Option<&'a HashMap<Vec<u8>, Vec<u8>>>> {
    match keys.get(key) {
        None => Ok(None),
        Some(RedisValue::Hash(hash)) => Ok(Some(hash)),
        Some(other) => Err(wrong_type(other)),
    }
}

impl RemoteCommands for MemoryConnection {
    fn hash_set(&mut self, hash: &str, field: &[u8], value: &[u8]) -> StoreResult<()> {
        let mut keys = self.keyspace()?;
        let entry = keys
            .entry(hash.to_string())
            .or_insert_with(|| RedisValue::Hash(HashMap::new()));
        match entry {
            RedisValue::Hash(fields) => {
                fields.insert(field.to_vec(), value.to_vec());
                Ok(())
            }
            other => Err(wrong_type(other)),
        }
    }

    fn hash_get(&mut self, hash: &str, field: &[u8]) -> StoreResult<Option<Vec<u8>>> {
        let keys = self.keyspace()?;
        Ok(as_hash(&keys, hash)?.and_then(|fields| fields.get(field).cloned()))
    }

    fn hash_get_all(&mut self, hash: &str) -> StoreResult<Vec<(Vec<u8>, Vec<u8>)>> {
        let keys = self.keyspace()?;
        Ok(as_hash(&keys, hash)?
            .map(|fields| {
                fields
                    .iter()
                    .map(|(field, value)| (field.clone(), value.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }

    fn hash_delete(&mut self, hash: &str, field: &[u8]) -> StoreResult<()> {
        let mut keys = self.keyspace()?;
        let now_empty = match keys.get_mut(hash) {
            None => return Ok(()),
            Some(RedisValue::Hash(fields)) => {
                fields.remove(field);
                fields.is_empty()
            }
            Some(other) => return Err(wrong_type(other)),
        };
        // Redis drops a hash once its last field is gone.
        if now_empty {
            keys.remove(hash);
        }
        Ok(())
    }

    fn delete_key(&mut self, key: &str) -> StoreResult<()> {
        self.keyspace()?.remove(key);
        Ok(())
    }

    fn list_push(&mut self, list: &str, value: &str, front: bool) -> StoreResult<()> {
        let mut keys = self.keyspace()?;
        let entry = keys
            .entry(list.to_string())
            .or_insert_with(|| RedisValue::List(VecDeque::new()));
        match entry {
            RedisValue::List(items) => {
                if front {
                    items.push_front(value.to_string());
                } else {
                    items.push_back(value.to_string());
                }
                Ok(())
            }
            other => Err(wrong_type(other)),
        }
    }

    fn list_range(&mut self, list: &str) -> StoreResult<Vec<String>> {
        let keys = self.keyspace()?;
        match keys.get(list) {
            None => Ok(Vec::new()),
            Some(RedisValue::List(items)) => Ok(items.iter().cloned().collect()),
            Some(other) => Err(wrong_type(other)),
        }
    }
}
