//! Server configuration
//!
//! Sources, later ones win:
//! 1. Built-in defaults
//! 2. Optional TOML file (`--config <path>`)
//! 3. Environment variables (`MONGO_URI`, `MONGO_DATABASE`, ...)
//! 4. Command-line flags (`--listen`, `--in-memory`, `--seed`), applied by the binary
//!
//! The store URI and database name have no defaults. A server that would
//! talk to MongoDB refuses to start without them.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use registro_core::{Error, Result};
use registro_storage::StoreConfig;
use serde::{Deserialize, Serialize};

/// Store connection string.
pub const ENV_MONGO_URI: &str = "MONGO_URI";
/// Database name.
pub const ENV_MONGO_DATABASE: &str = "MONGO_DATABASE";
/// Records collection name.
pub const ENV_MONGO_COLLECTION: &str = "MONGO_COLLECTION";
/// Listen address.
pub const ENV_LISTEN_ADDR: &str = "REGISTRO_LISTEN_ADDR";
/// Log level or filter directive.
pub const ENV_LOG_LEVEL: &str = "REGISTRO_LOG_LEVEL";
/// Log output format (`compact` or `json`).
pub const ENV_LOG_FORMAT: &str = "REGISTRO_LOG_FORMAT";

/// Default listen address.
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable single-line output
    #[default]
    Compact,
    /// JSON Lines for log shippers
    Json,
}

impl LogFormat {
    /// Parse a format name; `json` and `jsonl` select JSON, anything else is rejected.
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compact" | "text" => Ok(LogFormat::Compact),
            "json" | "jsonl" => Ok(LogFormat::Json),
            other => Err(Error::config(format!(
                "unknown log format '{}', expected \"compact\" or \"json\"",
                other
            ))),
        }
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Base level or `EnvFilter` directive (default: `info`)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Output format (default: compact)
    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

/// Full server configuration.
///
/// # Example
///
/// ```toml
/// listen_addr = "0.0.0.0:8080"
///
/// [store]
/// uri = "mongodb://localhost:27017"
/// database = "registro"
///
/// [logging]
/// level = "info"
/// format = "compact"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    /// Serve from an in-process store instead of MongoDB (development only)
    #[serde(default)]
    pub in_memory: bool,
    /// JSON array of records loaded into the in-memory store at startup
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed_file: Option<PathBuf>,
    /// Document store settings
    #[serde(default)]
    pub store: StoreConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_listen_addr() -> String {
    DEFAULT_LISTEN_ADDR.to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            in_memory: false,
            seed_file: None,
            store: StoreConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Defaults, then `path` if given, then the process environment.
    ///
    /// Does not validate; call [`ServerConfig::validate`] once CLI flags
    /// have been applied.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        toml::from_str(&content).map_err(|e| {
            Error::config(format!(
                "failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Override fields from environment variables looked up through `lookup`.
    ///
    /// Unset and empty variables leave the current value in place.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(uri) = get(ENV_MONGO_URI) {
            self.store.uri = uri;
        }
        if let Some(database) = get(ENV_MONGO_DATABASE) {
            self.store.database = database;
        }
        if let Some(collection) = get(ENV_MONGO_COLLECTION) {
            self.store.collection = collection;
        }
        if let Some(addr) = get(ENV_LISTEN_ADDR) {
            self.listen_addr = addr;
        }
        if let Some(level) = get(ENV_LOG_LEVEL) {
            self.logging.level = level;
        }
        if let Some(format) = get(ENV_LOG_FORMAT) {
            self.logging.format = LogFormat::parse(&format)?;
        }
        Ok(())
    }

    /// Parsed listen address.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.listen_addr.parse().map_err(|e| {
            Error::config(format!(
                "invalid listen address '{}': {}",
                self.listen_addr, e
            ))
        })
    }

    /// Check the configuration is complete enough to start serving.
    ///
    /// Store settings are only required when not running in memory, and a
    /// seed file is only accepted when running in memory.
    pub fn validate(&self) -> Result<()> {
        self.socket_addr()?;
        if self.in_memory {
            return Ok(());
        }
        if self.seed_file.is_some() {
            return Err(Error::config("seed_file requires in-memory mode"));
        }
        self.store.validate()
    }
}
