//! Integration tests for the embedded (redb) backend.

#![cfg(feature = "embedded")]

mod common;

use assert_matches::assert_matches;
use bucket_store::config::EmbeddedConfig;
use bucket_store::databases::redb_store::RedbStore;
use bucket_store::{BucketStore, Store, StoreError};
use common::embedded_store;
use std::sync::Arc;
use std::thread;
use tempfile::TempDir;

#[test]
fn test_scenario_users_bucket() {
    let dir = TempDir::new().unwrap();
    let store = Store::open(EmbeddedConfig::new(dir.path().join("api.redb")), &["users"]).unwrap();

    store.save("users", b"alice", br#"{"age":30}"#).unwrap();
    assert_eq!(store.get("users", b"alice").unwrap(), br#"{"age":30}"#);

    store.delete_bucket("users").unwrap();
    // Reads never recreate the bucket and never fail on its absence.
    assert!(store.get("users", b"alice").unwrap().is_empty());
    assert_matches!(store.delete_bucket("users"), Err(StoreError::BucketNotFound(_)));
}

#[test]
fn test_get_all_is_in_ascending_key_order() {
    let (store, _dir) = embedded_store(&["letters"]);
    for key in ["delta", "alpha", "charlie", "bravo"] {
        store.save("letters", key.as_bytes(), key.to_uppercase().as_bytes()).unwrap();
    }

    let values: Vec<String> = store
        .get_all("letters")
        .unwrap()
        .into_iter()
        .map(|v| String::from_utf8(v).unwrap())
        .collect();
    assert_eq!(values, vec!["ALPHA", "BRAVO", "CHARLIE", "DELTA"]);
}

#[test]
fn test_create_bucket_is_idempotent() {
    let (store, _dir) = embedded_store(&["users"]);
    store.save("users", b"alice", b"1").unwrap();

    assert!(store.create_bucket("users").unwrap());
    assert_eq!(store.get("users", b"alice").unwrap(), b"1");
    assert_eq!(store.bucket_names().unwrap(), vec!["users"]);
}

#[test]
fn test_empty_bucket_on_missing_bucket_fails_at_delete_step() {
    let (store, _dir) = embedded_store(&[]);
    assert_matches!(store.empty_bucket("missing"), Err(StoreError::BucketNotFound(_)));
    // The create step never ran.
    assert!(store.bucket_names().unwrap().is_empty());
}

#[test]
fn test_data_persists_across_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("persist.redb");

    let mut store = RedbStore::at_path(&path, &["users"]).unwrap();
    store.save("users", b"alice", b"30").unwrap();
    store.close().unwrap();

    let store = RedbStore::at_path(&path, &[]).unwrap();
    assert_eq!(store.get("users", b"alice").unwrap(), b"30");
    assert_eq!(store.bucket_names().unwrap(), vec!["users"]);
}

#[test]
fn test_truncate_discards_existing_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("trunc.redb");

    let mut store = RedbStore::at_path(&path, &[]).unwrap();
    store.save("users", b"alice", b"30").unwrap();
    store.close().unwrap();

    let config = EmbeddedConfig::builder().path(&path).truncate(true).build();
    let store = RedbStore::open(config, &[]).unwrap();
    assert!(store.get("users", b"alice").unwrap().is_empty());
}

#[test]
fn test_missing_file_without_create_is_connection_error() {
    let dir = TempDir::new().unwrap();
    let config = EmbeddedConfig::builder()
        .path(dir.path().join("absent.redb"))
        .create_if_missing(false)
        .build();
    assert_matches!(RedbStore::open(config, &[]), Err(StoreError::Connection(_)));
}

#[test]
fn test_second_open_of_same_file_is_connection_error() {
    let (first, _dir) = embedded_store(&[]);
    let second = RedbStore::at_path(first.path(), &[]);
    assert_matches!(second, Err(StoreError::Connection(_)));
}

#[test]
fn test_open_with_empty_bucket_name_is_provision_error() {
    let dir = TempDir::new().unwrap();
    let result = RedbStore::at_path(dir.path().join("p.redb"), &["ok", ""]);
    assert_matches!(
        result,
        Err(StoreError::BucketProvision { ref bucket, .. }) if bucket.is_empty()
    );
}

#[test]
fn test_failed_lazy_create_leaves_database_untouched() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("typed.redb");

    // A table with foreign key/value types under a bucket name.
    {
        let db = redb::Database::create(&path).unwrap();
        let txn = db.begin_write().unwrap();
        {
            let def: redb::TableDefinition<u64, u64> = redb::TableDefinition::new("typed");
            let mut table = txn.open_table(def).unwrap();
            table.insert(1, 1).unwrap();
        }
        txn.commit().unwrap();
    }

    let store = RedbStore::at_path(&path, &["users"]).unwrap();
    store.save("users", b"alice", b"1").unwrap();

    assert_matches!(
        store.save("typed", b"k", b"v"),
        Err(StoreError::BucketCreate { ref bucket, .. }) if bucket == "typed"
    );
    assert_eq!(store.get("users", b"alice").unwrap(), b"1");
    assert_eq!(store.bucket_names().unwrap(), vec!["typed", "users"]);
}

#[test]
fn test_concurrent_writers_are_serialized() {
    let (store, _dir) = embedded_store(&["counter"]);
    let store = Arc::new(store);

    let handles: Vec<_> = (0..4u8)
        .map(|t| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for i in 0..50u8 {
                    store.save("counter", &[t, i], &[i]).unwrap();
                }
            })
        })
        .collect();

    // Each writer commits in order, so any snapshot holds a gap-free prefix of
    // every writer's keys with the values that were written alongside them.
    for _ in 0..20 {
        let seen = store.get_all_with_keys("counter").unwrap();
        for t in 0..4u8 {
            let ours: Vec<_> = seen.iter().filter(|(k, _)| k[0] == t).collect();
            for (expected, (key, value)) in ours.iter().enumerate() {
                assert_eq!(key.as_slice(), &[t, expected as u8]);
                assert_eq!(value.as_slice(), &[expected as u8]);
            }
        }
    }

    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(store.get_all("counter").unwrap().len(), 200);
}

#[test]
fn test_temp_config_opens_fresh_database() {
    let config = EmbeddedConfig::temp();
    let path = config.path.clone();
    let mut store = RedbStore::open(config, &["scratch"]).unwrap();
    assert!(store.get_all("scratch").unwrap().is_empty());
    store.close().unwrap();
    std::fs::remove_file(path).ok();
}
