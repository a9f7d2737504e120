//! The contract every storage backend implements.
//!
//! [`BucketStore`] is object safe so callers can hold a `Box<dyn BucketStore>`
//! (which is exactly what [`Store`](crate::Store) does) and never learn which
//! engine sits underneath.

use crate::error::{StoreError, StoreResult};
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use strum::{AsRefStr, Display, EnumString};

/// Identifies the engine behind a store. Diagnostic only.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    Embedded,
    Networked,
}

/// Bucket-scoped key-value operations shared by both backends.
///
/// Keys and values are opaque bytes. Every method fails with
/// [`StoreError::Closed`] once [`close`](BucketStore::close) has run.
pub trait BucketStore: Send + Sync {
    fn backend(&self) -> Backend;

    /// Release the underlying file or connection.
    ///
    /// A second call fails with [`StoreError::Closed`].
    fn close(&mut self) -> StoreResult<()>;

    /// Create `name` if it does not exist. Succeeds when it already exists.
    fn create_bucket(&self, name: &str) -> StoreResult<bool>;

    /// Remove `name` and every record in it.
    ///
    /// The embedded backend fails with [`StoreError::BucketNotFound`] for an
    /// absent bucket; the networked backend treats that as a no-op.
    fn delete_bucket(&self, name: &str) -> StoreResult<()>;

    /// Delete `name`, then create it again.
    ///
    /// This is two independent steps, not one atomic clear: a concurrent
    /// caller can observe the bucket missing between them. The first failing
    /// step's error is returned.
    fn empty_bucket(&self, name: &str) -> StoreResult<()> {
        self.delete_bucket(name)?;
        self.create_bucket(name)?;
        Ok(())
    }

    /// Upsert `key` in `bucket`, creating the bucket if needed.
    fn update(&self, bucket: &str, key: &[u8], value: &[u8]) -> StoreResult<()>;

    /// Same as [`update`](BucketStore::update).
    fn save(&self, bucket: &str, key: &[u8], value: &[u8]) -> StoreResult<()> {
        self.update(bucket, key, value)
    }

    /// Fetch a value, distinguishing an absent key (`None`) from an empty value.
    fn lookup(&self, bucket: &str, key: &[u8]) -> StoreResult<Option<Vec<u8>>>;

    /// Fetch a value, returning an empty vector when the key or bucket is absent.
    ///
    /// Absence and an empty stored value look the same here; use
    /// [`lookup`](BucketStore::lookup) to tell them apart.
    fn get(&self, bucket: &str, key: &[u8]) -> StoreResult<Vec<u8>> {
        Ok(self.lookup(bucket, key)?.unwrap_or_default())
    }

    /// Every record of `bucket` in the engine's native enumeration order.
    ///
    /// Embedded: ascending key order. Networked: whatever order the server
    /// returns, which is neither sorted nor stable. An absent bucket is empty.
    fn entries(&self, bucket: &str) -> StoreResult<Vec<(Vec<u8>, Vec<u8>)>>;

    /// Values of `bucket`, in the order of [`entries`](BucketStore::entries).
    fn get_all(&self, bucket: &str) -> StoreResult<Vec<Vec<u8>>> {
        Ok(self
            .entries(bucket)?
            .into_iter()
            .map(|(_, value)| value)
            .collect())
    }

    fn get_all_with_keys(&self, bucket: &str) -> StoreResult<HashMap<Vec<u8>, Vec<u8>>> {
        Ok(self.entries(bucket)?.into_iter().collect())
    }

    /// Remove `key` from `bucket`. Absent keys and buckets are not an error.
    fn delete(&self, bucket: &str, key: &[u8]) -> StoreResult<()>;

    fn supports_lists(&self) -> bool {
        false
    }

    /// Push `value` onto the front or back of `list`, creating it if absent.
    fn save_to_list(&self, list: &str, value: &str, insert_at_front: bool) -> StoreResult<()> {
        let _ = (list, value, insert_at_front);
        Err(StoreError::Unsupported {
            operation: "save_to_list",
            backend: self.backend(),
        })
    }

    /// The whole of `list`, front to back. Empty when the list does not exist.
    fn get_all_in_list(&self, list: &str) -> StoreResult<Vec<String>> {
        let _ = list;
        Err(StoreError::Unsupported {
            operation: "get_all_in_list",
            backend: self.backend(),
        })
    }
}

pub(crate) fn validate_bucket_name(name: &str) -> StoreResult<()> {
    if name.is_empty() {
        return Err(StoreError::InvalidBucketName);
    }
    Ok(())
}

/// Create each of `buckets`, wrapping the first failure as a provisioning error.
pub(crate) fn provision_buckets<S>(store: &S, buckets: &[&str]) -> StoreResult<()>
where
    S: BucketStore + ?Sized,
{
    for bucket in buckets {
        if let Err(err) = store.create_bucket(bucket) {
            warn!(
                "{} store: provisioning bucket `{}` failed: {}",
                store.backend(),
                bucket,
                err
            );
            return Err(StoreError::BucketProvision {
                bucket: (*bucket).to_string(),
                source: Box::new(err),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_backend_names() {
        assert_eq!(Backend::Embedded.to_string(), "embedded");
        assert_eq!(Backend::Networked.as_ref(), "networked");
        assert_eq!(Backend::from_str("networked").ok(), Some(Backend::Networked));
    }

    #[test]
    fn test_empty_bucket_name_rejected() {
        assert!(matches!(
            validate_bucket_name(""),
            Err(StoreError::InvalidBucketName)
        ));
        assert!(validate_bucket_name("users").is_ok());
    }
}
