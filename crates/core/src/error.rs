//! Error types for the update pipeline
//!
//! Every layer below the HTTP handler reports failures with [`Error`].
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! # Categories
//!
//! | Category | Variants | When |
//! |----------|----------|------|
//! | Startup | `Config`, `Connection` | Fatal, process exits before serving |
//! | Operation | `Store`, `Timeout`, `Serialization` | Per request, reported as a server error |
//!
//! A missing record is not an error. It is reported as an
//! [`UpdateOutcome`](crate::UpdateOutcome) with zero matches.

use std::fmt::Display;
use std::time::Duration;

use thiserror::Error;

/// Result type alias for registro operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the update pipeline
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Missing or invalid configuration
    #[error("invalid configuration: {reason}")]
    Config {
        /// What was wrong
        reason: String,
    },

    /// The store could not be reached at startup
    #[error("connection failed: {reason}")]
    Connection {
        /// Driver or network detail
        reason: String,
    },

    /// The store rejected or failed an operation
    #[error("{operation} failed: {reason}")]
    Store {
        /// Operation name (`update`, `find`, `insert`, `create_index`)
        operation: &'static str,
        /// Driver or store detail
        reason: String,
    },

    /// The store did not answer within the operation timeout
    #[error("{operation} timed out after {timeout_ms}ms")]
    Timeout {
        /// Operation name
        operation: &'static str,
        /// Timeout that expired
        timeout_ms: u64,
    },

    /// A stored document could not be converted
    #[error("serialization error: {reason}")]
    Serialization {
        /// Conversion detail
        reason: String,
    },
}

impl Error {
    /// Configuration error
    pub fn config(reason: impl Display) -> Self {
        Error::Config {
            reason: reason.to_string(),
        }
    }

    /// Connection error
    pub fn connection(reason: impl Display) -> Self {
        Error::Connection {
            reason: reason.to_string(),
        }
    }

    /// Store operation error
    pub fn store(operation: &'static str, reason: impl Display) -> Self {
        Error::Store {
            operation,
            reason: reason.to_string(),
        }
    }

    /// Operation timeout
    pub fn timeout(operation: &'static str, timeout: Duration) -> Self {
        Error::Timeout {
            operation,
            timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// Serialization error
    pub fn serialization(reason: impl Display) -> Self {
        Error::Serialization {
            reason: reason.to_string(),
        }
    }

    /// True for errors that must stop the process before it serves traffic.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Config { .. } | Error::Connection { .. })
    }
}

impl From<bson::de::Error> for Error {
    fn from(e: bson::de::Error) -> Self {
        Error::serialization(e)
    }
}

impl From<bson::ser::Error> for Error {
    fn from(e: bson::ser::Error) -> Self {
        Error::serialization(e)
    }
}
