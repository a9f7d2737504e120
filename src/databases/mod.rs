#[cfg(feature = "embedded")]
pub mod redb_store;

pub mod redis_store;
