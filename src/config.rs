//! Configuration for both storage backends.
//!
//! Builders are provided via `typed-builder`. A [`Locator`] picks the backend
//! and carries its configuration into [`Store::open`](crate::Store::open).

use derive_more::From;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use typed_builder::TypedBuilder;

/// Port appended to every networked host.
pub const REDIS_PORT: u16 = 6379;

/// Logical database selected on every networked connection.
pub const REDIS_DATABASE: i64 = 0;

/// Permission bits for newly created embedded database files.
pub const EMBEDDED_FILE_MODE: u32 = 0o600;

/// Configuration for the embedded (Redb) backend.
///
/// # Examples
///
/// ```
/// use bucket_store::config::EmbeddedConfig;
///
/// let config = EmbeddedConfig::builder()
///     .path("/data/api.redb")
///     .truncate(true)
///     .build();
/// assert!(config.create_if_missing);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TypedBuilder)]
#[builder(doc)]
pub struct EmbeddedConfig {
    /// Path to the database file
    #[builder(setter(into))]
    pub path: PathBuf,

    /// Create the file if it does not exist yet
    #[builder(default = true)]
    #[serde(default = "default_true")]
    pub create_if_missing: bool,

    /// Remove an existing file before opening
    #[builder(default = false)]
    #[serde(default)]
    pub truncate: bool,
}

fn default_true() -> bool {
    true
}

impl EmbeddedConfig {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            create_if_missing: true,
            truncate: false,
        }
    }

    /// A fresh file under the system temp directory.
    pub fn temp() -> Self {
        let name = format!("bucket_store_{}.redb", uuid::Uuid::new_v4());
        Self::new(std::env::temp_dir().join(name))
    }
}

/// Configuration for the networked (Redis) backend.
///
/// Only the host and credential vary; port and database index are fixed.
///
/// ```
/// use bucket_store::config::NetworkedConfig;
///
/// let config = NetworkedConfig::builder()
///     .host("cache.internal")
///     .password(Some("s3cret".to_string()))
///     .build();
/// assert_eq!(config.address(), "cache.internal:6379");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TypedBuilder)]
#[builder(doc)]
pub struct NetworkedConfig {
    /// Host name or IP address, without a port
    #[builder(setter(into))]
    pub host: String,

    /// Access credential, `None` for an open server
    #[builder(default = None)]
    #[serde(default)]
    pub password: Option<String>,
}

impl NetworkedConfig {
    pub fn new<S: Into<String>>(host: S) -> Self {
        Self {
            host: host.into(),
            password: None,
        }
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, REDIS_PORT)
    }

    /// Assemble the connection info handed to the redis client.
    #[cfg(feature = "networked")]
    pub fn connection_info(&self) -> redis::ConnectionInfo {
        redis::ConnectionInfo {
            addr: redis::ConnectionAddr::Tcp(self.host.clone(), REDIS_PORT),
            redis: redis::RedisConnectionInfo {
                db: REDIS_DATABASE,
                password: self.password.clone().filter(|p| !p.is_empty()),
                ..Default::default()
            },
        }
    }
}

/// Backend selection plus its location information.
#[derive(Debug, Clone, PartialEq, Eq, From, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum Locator {
    Embedded(EmbeddedConfig),
    Networked(NetworkedConfig),
}

impl Locator {
    pub fn backend(&self) -> crate::Backend {
        match self {
            Locator::Embedded(_) => crate::Backend::Embedded,
            Locator::Networked(_) => crate::Backend::Networked,
        }
    }
}
