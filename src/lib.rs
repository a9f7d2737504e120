//! # Bucket Store
//!
//! One key-value contract, two very different engines behind it.
//!
//! - **Embedded** ([`RedbStore`](databases::redb_store::RedbStore)): a single
//!   redb file. Each call is one ACID transaction; reads see a snapshot;
//!   enumeration is in ascending key order.
//! - **Networked** ([`RedisStore`](databases::redis_store::RedisStore)): a
//!   Redis-compatible server. Each call is one command; buckets are hashes;
//!   named lists are supported natively.
//!
//! Pick a backend once with [`Store::open`], then use [`BucketStore`] only.
//!
//! ## Quick Start
//!
//! ```rust
//! use bucket_store::prelude::*;
//!
//! let dir = tempfile::tempdir().unwrap();
//! let store = Store::open(EmbeddedConfig::new(dir.path().join("api.redb")), &["users"])?;
//!
//! store.save("users", b"alice", br#"{"age":30}"#)?;
//! assert_eq!(store.get("users", b"alice")?, br#"{"age":30}"#);
//!
//! // Absent keys read back empty rather than failing.
//! assert!(store.get("users", b"nobody")?.is_empty());
//! assert_eq!(store.lookup("users", b"nobody")?, None);
//! # Ok::<(), bucket_store::StoreError>(())
//! ```
//!
//! ## Differences that stay visible
//!
//! | | embedded | networked |
//! |---|---|---|
//! | `get_all` order | ascending key | server order |
//! | `delete_bucket` on absent bucket | `BucketNotFound` | no-op |
//! | lists | unsupported | supported |
//! | atomicity | one transaction per call | one command per call |
//!
//! `empty_bucket` is delete-then-create on both, and is not atomic.

pub mod config;
pub mod databases;
pub mod error;
pub mod prelude;
pub mod store;
pub mod traits;

pub use config::{EmbeddedConfig, Locator, NetworkedConfig};
pub use error::{BackendError, StoreError, StoreResult};
pub use store::Store;
pub use traits::{Backend, BucketStore};
