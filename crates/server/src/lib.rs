//! # Registro Server
//!
//! HTTP front end for the record-update pipeline:
//!
//! ```text
//! PUT /update/update-by-cedula/{cedula}
//!   -> UpdateService -> RecordRepository -> DocumentCollection
//! ```
//!
//! - [`http`] holds the router and the only status-code mapping in the system
//! - [`config`] loads [`ServerConfig`] from file and environment
//! - [`logging`] installs the tracing subscriber used by the binary
//! - [`app`] wires the layers together for either MongoDB or the in-memory store

#![warn(missing_docs)]

pub mod app;
pub mod config;
pub mod http;
pub mod logging;

pub use app::{build_app, connect_store};
pub use config::{LogFormat, LoggingConfig, ServerConfig};
pub use http::{router, serve, UpdateResponse, UPDATE_ROUTE};
