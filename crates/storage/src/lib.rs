//! Storage layer for Registro
//!
//! This crate owns everything between the update service and the document
//! store:
//! - StoreGateway: connects to MongoDB once at startup and hands out collections
//! - DocumentCollection: the async port the repository talks to
//! - MongoCollection / MemoryCollection: driver-backed and in-process adapters
//! - RecordRepository: builds the natural-key filter and `$set` document,
//!   bounds each call by the operation timeout
//!
//! # Natural key
//!
//! Records are addressed by `cedula` only. Uniqueness is declared to the
//! store as a unique index (see [`StoreGateway::ensure_indexes`]) and is not
//! re-checked per request.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod collection;
pub mod config;
pub mod gateway;
pub mod memory;
pub mod mongo;
pub mod repository;

pub use collection::DocumentCollection;
pub use config::StoreConfig;
pub use gateway::StoreGateway;
pub use memory::MemoryCollection;
pub use mongo::MongoCollection;
pub use repository::{national_id_filter, set_document, RecordRepository};
