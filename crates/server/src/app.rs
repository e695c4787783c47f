//! Layer wiring: collection -> repository -> service -> router.

use std::path::Path;
use std::sync::Arc;

use axum::Router;
use registro_core::{Error, Record, Result};
use registro_service::{RecordService, UpdateService};
use registro_storage::gateway::ensure_record_indexes;
use registro_storage::{
    DocumentCollection, MemoryCollection, RecordRepository, StoreConfig, StoreGateway,
};
use tracing::{info, warn};

use crate::config::ServerConfig;
use crate::http::router;

/// Open the records collection the server will use.
///
/// Connects to MongoDB through [`StoreGateway`] unless `in_memory` is set.
/// The natural-key index is declared when `store.ensure_indexes` is on.
/// In memory, records from `seed_file` are inserted after the index exists,
/// so a seed with duplicate keys fails startup.
///
/// # Errors
///
/// Any error here means the process must not serve traffic.
pub async fn connect_store(config: &ServerConfig) -> Result<Arc<dyn DocumentCollection>> {
    if config.in_memory {
        warn!(
            target: "registro::server",
            "Serving from the in-memory store; records are lost on exit"
        );
        let records = Arc::new(MemoryCollection::new());
        if config.store.ensure_indexes {
            ensure_record_indexes(records.as_ref()).await?;
        }
        if let Some(path) = &config.seed_file {
            let seeded = load_seed(path)?;
            let count = seeded.len();
            for record in seeded {
                records.insert_one(bson::to_document(&record)?).await?;
            }
            info!(
                target: "registro::server",
                path = %path.display(),
                count,
                "Seeded in-memory store"
            );
        }
        return Ok(records);
    }

    let gateway = StoreGateway::connect(&config.store).await?;
    gateway.ensure_indexes().await?;
    Ok(gateway.records())
}

/// Read a JSON array of records.
fn load_seed(path: &Path) -> Result<Vec<Record>> {
    let content = std::fs::read(path).map_err(|e| {
        Error::config(format!(
            "failed to read seed file '{}': {}",
            path.display(),
            e
        ))
    })?;
    serde_json::from_slice(&content).map_err(|e| {
        Error::config(format!(
            "failed to parse seed file '{}': {}",
            path.display(),
            e
        ))
    })
}

/// Build the HTTP application over `records`.
pub fn build_app(records: Arc<dyn DocumentCollection>, store: &StoreConfig) -> Router {
    let repository = RecordRepository::from_config(records, store);
    let service: Arc<dyn UpdateService> = Arc::new(RecordService::new(repository));
    router(service)
}
