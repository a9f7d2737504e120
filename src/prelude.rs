//! Prelude module for convenient imports.
//!
//! ```rust
//! use bucket_store::prelude::*;
//! ```

pub use crate::config::{EmbeddedConfig, Locator, NetworkedConfig};
pub use crate::error::{StoreError, StoreResult};
pub use crate::store::Store;
pub use crate::traits::{Backend, BucketStore};

#[cfg(feature = "embedded")]
pub use crate::databases::redb_store::RedbStore;
pub use crate::databases::redis_store::{MemoryServer, RedisStore, RemoteCommands};
