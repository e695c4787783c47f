//! Document store configuration
//!
//! Loaded as the `[store]` section of the server configuration and
//! overridable from the environment (`MONGO_URI`, `MONGO_DATABASE`,
//! `MONGO_COLLECTION`).

use std::time::Duration;

use registro_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Default collection holding user records.
pub const DEFAULT_COLLECTION: &str = "users";
/// Default bound on connection establishment, in milliseconds.
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 10_000;
/// Default bound on a single store operation, in milliseconds.
pub const DEFAULT_OPERATION_TIMEOUT_MS: u64 = 5_000;

/// Connection and timeout settings for the document store.
///
/// # Example
///
/// ```toml
/// [store]
/// uri = "mongodb://localhost:27017"
/// database = "registro"
/// # collection = "users"
/// # connect_timeout_ms = 10000
/// # operation_timeout_ms = 5000
/// # ensure_indexes = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// MongoDB connection string
    #[serde(default)]
    pub uri: String,
    /// Database name
    #[serde(default)]
    pub database: String,
    /// Collection holding user records
    #[serde(default = "default_collection")]
    pub collection: String,
    /// Bound on connection establishment (default: 10000)
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    /// Bound on each store operation (default: 5000)
    #[serde(default = "default_operation_timeout_ms")]
    pub operation_timeout_ms: u64,
    /// Create the unique `cedula` index at startup (default: true)
    #[serde(default = "default_ensure_indexes")]
    pub ensure_indexes: bool,
}

fn default_collection() -> String {
    DEFAULT_COLLECTION.to_string()
}

fn default_connect_timeout_ms() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_MS
}

fn default_operation_timeout_ms() -> u64 {
    DEFAULT_OPERATION_TIMEOUT_MS
}

fn default_ensure_indexes() -> bool {
    true
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            uri: String::new(),
            database: String::new(),
            collection: default_collection(),
            connect_timeout_ms: default_connect_timeout_ms(),
            operation_timeout_ms: default_operation_timeout_ms(),
            ensure_indexes: default_ensure_indexes(),
        }
    }
}

impl StoreConfig {
    /// Config pointing at `uri` / `database` with default timeouts.
    pub fn new(uri: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            database: database.into(),
            ..Self::default()
        }
    }

    /// Check that the store can be addressed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the URI, database or collection is
    /// empty, or when a timeout is zero.
    pub fn validate(&self) -> Result<()> {
        if self.uri.trim().is_empty() {
            return Err(Error::config("store URI is not set (MONGO_URI)"));
        }
        if self.database.trim().is_empty() {
            return Err(Error::config("database name is not set (MONGO_DATABASE)"));
        }
        if self.collection.trim().is_empty() {
            return Err(Error::config("collection name is empty"));
        }
        if self.connect_timeout_ms == 0 {
            return Err(Error::config("connect_timeout_ms must be greater than zero"));
        }
        if self.operation_timeout_ms == 0 {
            return Err(Error::config("operation_timeout_ms must be greater than zero"));
        }
        Ok(())
    }

    /// Connection establishment bound.
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// Per-operation bound.
    pub fn operation_timeout(&self) -> Duration {
        Duration::from_millis(self.operation_timeout_ms)
    }
}
