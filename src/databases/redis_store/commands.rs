//! The handful of server commands the networked backend issues.
//!
//! [`RedisStore`](super::RedisStore) only ever talks to the server through
//! [`RemoteCommands`], one method per command, so the store logic is the
//! same whether the other end is a real Redis connection or a
//! [`MemoryServer`](super::memory::MemoryServer).

use crate::error::StoreResult;

pub trait RemoteCommands: Send {
    /// `HSET hash field value`
    fn hash_set(&mut self, hash: &str, field: &[u8], value: &[u8]) -> StoreResult<()>;

    /// `HGET hash field`
    fn hash_get(&mut self, hash: &str, field: &[u8]) -> StoreResult<Option<Vec<u8>>>;

    /// `HGETALL hash`, in the order the server replies.
    fn hash_get_all(&mut self, hash: &str) -> StoreResult<Vec<(Vec<u8>, Vec<u8>)>>;

    /// `HDEL hash field`
    fn hash_delete(&mut self, hash: &str, field: &[u8]) -> StoreResult<()>;

    /// `DEL key`
    fn delete_key(&mut self, key: &str) -> StoreResult<()>;

    /// `LPUSH list value` when `front`, otherwise `RPUSH list value`.
    fn list_push(&mut self, list: &str, value: &str, front: bool) -> StoreResult<()>;

    /// `LRANGE list 0 -1`
    fn list_range(&mut self, list: &str) -> StoreResult<Vec<String>>;
}

#[cfg(feature = "networked")]
mod client {
    use super::RemoteCommands;
    use crate::error::StoreResult;
    use redis::Commands;

    impl RemoteCommands for redis::Connection {
        fn hash_set(&mut self, hash: &str, field: &[u8], value: &[u8]) -> StoreResult<()> {
            self.hset::<_, _, _, ()>(hash, field, value)?;
            Ok(())
        }

        fn hash_get(&mut self, hash: &str, field: &[u8]) -> StoreResult<Option<Vec<u8>>> {
            Ok(self.hget::<_, _, Option<Vec<u8>>>(hash, field)?)
        }

        fn hash_get_all(&mut self, hash: &str) -> StoreResult<Vec<(Vec<u8>, Vec<u8>)>> {
            Ok(self.hgetall::<_, Vec<(Vec<u8>, Vec<u8>)>>(hash)?)
        }

        fn hash_delete(&mut self, hash: &str, field: &[u8]) -> StoreResult<()> {
            self.hdel::<_, _, ()>(hash, field)?;
            Ok(())
        }

        fn delete_key(&mut self, key: &str) -> StoreResult<()> {
            self.del::<_, ()>(key)?;
            Ok(())
        }

        fn list_push(&mut self, list: &str, value: &str, front: bool) -> StoreResult<()> {
            if front {
                self.lpush::<_, _, ()>(list, value)?;
            } else {
                self.rpush::<_, _, ()>(list, value)?;
            }
            Ok(())
        }

        fn list_range(&mut self, list: &str) -> StoreResult<Vec<String>> {
            Ok(self.lrange::<_, Vec<String>>(list, 0, -1)?)
        }
    }

}
