//! Core types for Registro
//!
//! This crate defines the foundational types shared by every layer of the
//! update pipeline:
//! - Record: the persisted user document
//! - RecordUpdate: the four mutable fields carried by an update request
//! - NationalId: the natural key (cédula) used to address a record
//! - UpdateOutcome: matched/modified counts reported by the store
//! - Error: error type hierarchy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod outcome;
pub mod record;

pub use error::{Error, Result};
pub use outcome::UpdateOutcome;
pub use record::{fields, NationalId, Record, RecordUpdate};

// Re-export the BSON identifier type so callers don't need bson directly
pub use bson::oid::ObjectId;
