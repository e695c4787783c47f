//! Update service for Registro
//!
//! The service sits between the HTTP handler and the repository. Today it
//! delegates unchanged; it is the place where field-level authorization,
//! derived fields or domain events attach without touching transport or
//! storage code.
//!
//! The handler depends on the [`UpdateService`] trait, never on
//! [`RecordService`] directly.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod service;

pub use service::{RecordService, UpdateService};
