//! Embedded backend on top of [redb](https://docs.rs/redb).
//!
//! A bucket is a redb table of raw byte keys and values, named after the
//! bucket. redb keeps keys in a B-tree, so enumeration is in ascending key
//! order. Writers are serialized by redb; readers never block and always see
//! a committed snapshot.
//!
//! ```
//! use bucket_store::config::EmbeddedConfig;
//! use bucket_store::databases::redb_store::RedbStore;
//! use bucket_store::BucketStore;
//!
//! let dir = tempfile::tempdir().unwrap();
//! let store = RedbStore::open(EmbeddedConfig::new(dir.path().join("api.redb")), &["users"]).unwrap();
//!
//! store.save("users", b"alice", br#"{"age":30}"#).unwrap();
//! assert_eq!(store.get("users", b"alice").unwrap(), br#"{"age":30}"#);
//! ```

use crate::config::{EMBEDDED_FILE_MODE, EmbeddedConfig};
use crate::error::{BackendError, StoreError, StoreResult};
use crate::traits::bucket_store::{provision_buckets, validate_bucket_name};
use crate::traits::{Backend, BucketStore};
use log::{debug, trace};
use redb::{ReadableTable, TableHandle};
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::Instant;

pub mod transaction;

use transaction::{bucket_table, not_found, table_exists, table_missing};

/// File-persisted store with one redb table per bucket.
pub struct RedbStore {
    db: Option<redb::Database>,
    path: PathBuf,
}

impl RedbStore {
    /// Open (or create) the database file and provision `buckets`.
    ///
    /// ## Errors
    ///
    /// [`StoreError::Connection`] when the file cannot be opened or is locked
    /// by another store, [`StoreError::BucketProvision`] when a bucket cannot
    /// be created.
    pub fn open(config: EmbeddedConfig, buckets: &[&str]) -> StoreResult<Self> {
        let start = Instant::now();
        debug!("RedbStore: Opening database at {}", config.path.display());

        if config.truncate && config.path.exists() {
            std::fs::remove_file(&config.path)
                .map_err(|e| StoreError::Connection(BackendError::Io(e)))?;
        }

        let file = open_database_file(&config)
            .map_err(|e| StoreError::Connection(BackendError::Io(e)))?;
        let db = redb::Builder::new()
            .create_file(file)
            .map_err(|e| StoreError::Connection(BackendError::Database(e)))?;

        let store = RedbStore {
            db: Some(db),
            path: config.path,
        };
        provision_buckets(&store, buckets)?;

        debug!("RedbStore: Opened in {:?}", start.elapsed());
        Ok(store)
    }

    /// Shorthand for [`open`](RedbStore::open) with default options.
    pub fn at_path<P: AsRef<Path>>(path: P, buckets: &[&str]) -> StoreResult<Self> {
        Self::open(EmbeddedConfig::new(path.as_ref()), buckets)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Names of every bucket currently in the file, ascending.
    pub fn bucket_names(&self) -> StoreResult<Vec<String>> {
        self.read(|txn| {
            let mut names: Vec<String> = txn
                .list_tables()?
                .map(|handle| handle.name().to_string())
                .collect();
            names.sort();
            Ok(names)
        })
    }

    pub(crate) fn database(&self) -> StoreResult<&redb::Database> {
        self.db.as_ref().ok_or(StoreError::Closed)
    }
}

fn open_database_file(config: &EmbeddedConfig) -> std::io::Result<File> {
    let mut options = OpenOptions::new();
    options
        .read(true)
        .write(true)
        .create(config.create_if_missing);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(EMBEDDED_FILE_MODE);
    }
    #[cfg(not(unix))]
    let _ = EMBEDDED_FILE_MODE;
    options.open(&config.path)
}

impl BucketStore for RedbStore {
    fn backend(&self) -> Backend {
        Backend::Embedded
    }

    fn close(&mut self) -> StoreResult<()> {
        let db = self.db.take().ok_or(StoreError::Closed)?;
        drop(db);
        debug!("RedbStore: Closed {}", self.path.display());
        Ok(())
    }

    fn create_bucket(&self, name: &str) -> StoreResult<bool> {
        validate_bucket_name(name)?;
        trace!("RedbStore: create_bucket {}", name);
        self.write(|txn| {
            txn.open_table(bucket_table(name))?;
            Ok(true)
        })
    }

    fn delete_bucket(&self, name: &str) -> StoreResult<()> {
        validate_bucket_name(name)?;
        trace!("RedbStore: delete_bucket {}", name);
        self.write(|txn| {
            if txn.delete_table(bucket_table(name))? {
                Ok(())
            } else {
                Err(not_found(name))
            }
        })
    }

    fn update(&self, bucket: &str, key: &[u8], value: &[u8]) -> StoreResult<()> {
        validate_bucket_name(bucket)?;
        trace!("RedbStore: update {} ({} bytes)", bucket, value.len());
        self.write(|txn| {
            let mut table =
                txn.open_table(bucket_table(bucket))
                    .map_err(|e| StoreError::BucketCreate {
                        bucket: bucket.to_string(),
                        source: BackendError::Table(e),
                    })?;
            table.insert(key, value)?;
            Ok(())
        })
    }

    fn lookup(&self, bucket: &str, key: &[u8]) -> StoreResult<Option<Vec<u8>>> {
        validate_bucket_name(bucket)?;
        self.read(|txn| {
            let table = match txn.open_table(bucket_table(bucket)) {
                Ok(table) => table,
                Err(err) if table_missing(&err) => return Ok(None),
                Err(err) => return Err(err.into()),
            };
            Ok(table.get(key)?.map(|guard| guard.value().to_vec()))
        })
    }

    fn entries(&self, bucket: &str) -> StoreResult<Vec<(Vec<u8>, Vec<u8>)>> {
        validate_bucket_name(bucket)?;
        self.read(|txn| {
            let table = match txn.open_table(bucket_table(bucket)) {
                Ok(table) => table,
                Err(err) if table_missing(&err) => return Ok(Vec::new()),
                Err(err) => return Err(err.into()),
            };
            let mut entries = Vec::new();
            for item in table.iter()? {
                let (key, value) = item?;
                entries.push((key.value().to_vec(), value.value().to_vec()));
            }
            Ok(entries)
        })
    }

    fn delete(&self, bucket: &str, key: &[u8]) -> StoreResult<()> {
        validate_bucket_name(bucket)?;
        trace!("RedbStore: delete from {}", bucket);
        self.write(|txn| {
            // Opening a missing table would create it.
            if !table_exists(txn, bucket)? {
                return Ok(());
            }
            let mut table = txn.open_table(bucket_table(bucket))?;
            table.remove(key)?;
            Ok(())
        })
    }
}

impl std::fmt::Debug for RedbStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbStore")
            .field("path", &self.path)
            .field("open", &self.db.is_some())
            .finish()
    }
}
