//! Transaction scoping for the Redb backend.
//!
//! Every public operation runs inside exactly one of these helpers, so one
//! call is one transaction: a write commits only if its closure succeeds and
//! is aborted otherwise, a read sees one MVCC snapshot.

use super::RedbStore;
use crate::error::{StoreError, StoreResult};
use log::{debug, warn};
use redb::{ReadableDatabase, TableDefinition, TableHandle};
use std::time::Instant;

/// Raw byte table backing one bucket.
pub(crate) type BucketTable<'a> = TableDefinition<'a, &'static [u8], &'static [u8]>;

pub(crate) fn bucket_table(name: &str) -> BucketTable<'_> {
    TableDefinition::new(name)
}

impl RedbStore {
    pub(crate) fn read<F, R>(&self, f: F) -> StoreResult<R>
    where
        F: FnOnce(&redb::ReadTransaction) -> StoreResult<R>,
    {
        let txn = self.database()?.begin_read()?;
        f(&txn)
    }

    pub(crate) fn write<F, R>(&self, f: F) -> StoreResult<R>
    where
        F: FnOnce(&redb::WriteTransaction) -> StoreResult<R>,
    {
        let txn = self.database()?.begin_write()?;
        match f(&txn) {
            Ok(result) => {
                let start = Instant::now();
                txn.commit()?;
                debug!("RedbStore: Committed in {:?}", start.elapsed());
                Ok(result)
            }
            Err(err) => {
                if let Err(abort_err) = txn.abort() {
                    warn!("RedbStore: Abort after `{}` failed: {}", err, abort_err);
                }
                Err(err)
            }
        }
    }
}

/// Whether a table named `name` exists, checked without creating it.
pub(crate) fn table_exists(txn: &redb::WriteTransaction, name: &str) -> StoreResult<bool> {
    Ok(txn.list_tables()?.any(|handle| handle.name() == name))
}

pub(crate) fn table_missing(err: &redb::TableError) -> bool {
    matches!(err, redb::TableError::TableDoesNotExist(_))
}

pub(crate) fn not_found(bucket: &str) -> StoreError {
    StoreError::BucketNotFound(bucket.to_string())
}
