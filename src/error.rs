//! Error types for bucket store operations.
//!
//! Every fallible call returns [`StoreResult<T>`]. Errors raised by the
//! storage engines are wrapped in [`BackendError`] and surfaced through the
//! [`StoreError`] variant describing *where* the failure happened, so callers
//! can branch on the failure class without knowing which backend is in use.
//!
//! ```
//! use bucket_store::error::{StoreError, StoreResult};
//!
//! fn handle(result: StoreResult<()>) {
//!     match result {
//!         Ok(()) => {}
//!         Err(StoreError::BucketNotFound(name)) => eprintln!("no bucket {name}"),
//!         Err(err) if err.is_retryable() => eprintln!("backend unreachable: {err}"),
//!         Err(err) => eprintln!("store error: {err}"),
//!     }
//! }
//!
//! handle(Err(StoreError::BucketNotFound("users".into())));
//! ```

use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure classes shared by both backends.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The backend could not be opened or reached.
    #[error("connection error: {0}")]
    Connection(#[source] BackendError),

    /// A bucket requested at open time could not be created.
    #[error("failed to provision bucket `{bucket}`: {source}")]
    BucketProvision {
        bucket: String,
        #[source]
        source: Box<StoreError>,
    },

    /// A write could not lazily create its bucket.
    #[error("failed to create bucket `{bucket}`: {source}")]
    BucketCreate {
        bucket: String,
        #[source]
        source: BackendError,
    },

    #[error("bucket not found: {0}")]
    BucketNotFound(String),

    /// Generic engine-reported failure during a read, write, delete or list call.
    #[error("operation failed: {0}")]
    Operation(#[source] BackendError),

    #[error("store is closed")]
    Closed,

    #[error("bucket names must not be empty")]
    InvalidBucketName,

    #[error("`{operation}` is not supported by the {backend} backend")]
    Unsupported {
        operation: &'static str,
        backend: crate::Backend,
    },
}

impl StoreError {
    /// True for failures a caller may reasonably retry (the backend was unreachable).
    ///
    /// Nothing inside this crate retries; the classification is for wrappers.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::Connection(_))
    }

    pub fn is_bucket_not_found(&self) -> bool {
        matches!(self, StoreError::BucketNotFound(_))
    }
}

/// Engine-level error wrapped by [`StoreError`].
#[derive(Error, Debug)]
pub enum BackendError {
    #[cfg(feature = "embedded")]
    #[error(transparent)]
    Database(#[from] redb::DatabaseError),

    #[cfg(feature = "embedded")]
    #[error(transparent)]
    Transaction(#[from] redb::TransactionError),

    #[cfg(feature = "embedded")]
    #[error(transparent)]
    Table(#[from] redb::TableError),

    #[cfg(feature = "embedded")]
    #[error(transparent)]
    Storage(#[from] redb::StorageError),

    #[cfg(feature = "embedded")]
    #[error(transparent)]
    Commit(#[from] redb::CommitError),

    #[cfg(feature = "networked")]
    #[error(transparent)]
    Redis(#[from] redis::RedisError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Error reply produced by a server that is not reached through the redis client.
    #[error("server error: {0}")]
    Reply(String),

    /// A command panicked while holding the connection.
    #[error("connection lock poisoned")]
    Poisoned,
}

macro_rules! impl_from_backend {
    ($($(#[$meta:meta])* $err:ty => $variant:ident),* $(,)?) => {
        $(
            $(#[$meta])*
            impl From<$err> for StoreError {
                fn from(err: $err) -> Self {
                    StoreError::Operation(BackendError::$variant(err))
                }
            }
        )*
    };
}

impl_from_backend!(
    #[cfg(feature = "embedded")]
    redb::TransactionError => Transaction,
    #[cfg(feature = "embedded")]
    redb::TableError => Table,
    #[cfg(feature = "embedded")]
    redb::StorageError => Storage,
    #[cfg(feature = "embedded")]
    redb::CommitError => Commit,
    std::io::Error => Io,
);

#[cfg(feature = "networked")]
impl From<redis::RedisError> for StoreError {
    fn from(err: redis::RedisError) -> Self {
        if err.is_connection_dropped() || err.is_connection_refusal() || err.is_io_error() {
            StoreError::Connection(BackendError::Redis(err))
        } else {
            StoreError::Operation(BackendError::Redis(err))
        }
    }
}
