//! Registro - record-update microservice keyed by national id
//!
//! Registro exposes one endpoint that overwrites the mutable fields of a
//! user record found by its cédula:
//!
//! ```text
//! PUT /update/update-by-cedula/{cedula}
//! {"nombre": "...", "telefono": "...", "direccion": "...", "correo": "..."}
//! ```
//!
//! # Quick Start
//!
//! ```ignore
//! use registro::{build_app, connect_store, ServerConfig};
//!
//! let config = ServerConfig::load(None)?;
//! let records = connect_store(&config).await?;
//! let app = build_app(records, &config.store);
//! ```
//!
//! # Architecture
//!
//! | Layer | Crate | Knows about |
//! |-------|-------|-------------|
//! | Handler | `registro-server` | HTTP status codes, JSON bodies |
//! | Service | `registro-service` | business rules (none yet) |
//! | Repository | `registro-storage` | filters, `$set`, timeouts |
//! | Gateway | `registro-storage` | MongoDB client lifecycle |

pub use registro_core::{
    fields, Error, NationalId, ObjectId, Record, RecordUpdate, Result, UpdateOutcome,
};
pub use registro_server::{
    build_app, connect_store, router, serve, LogFormat, LoggingConfig, ServerConfig,
    UpdateResponse, UPDATE_ROUTE,
};
pub use registro_service::{RecordService, UpdateService};
pub use registro_storage::{
    national_id_filter, set_document, DocumentCollection, MemoryCollection, MongoCollection,
    RecordRepository, StoreConfig, StoreGateway,
};
