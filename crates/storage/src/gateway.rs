//! Persistence gateway
//!
//! Owns the single MongoDB client for the process. The gateway is built once
//! at startup by [`StoreGateway::connect`] and handed, by value, to whatever
//! needs a collection. There is no global handle and no reconnect logic: a
//! dropped connection surfaces as operation errors from the repository.

use std::sync::Arc;

use bson::doc;
use mongodb::options::ClientOptions;
use mongodb::{Client, Database};
use registro_core::{fields, Error, Result};
use tracing::info;

use crate::collection::DocumentCollection;
use crate::config::StoreConfig;
use crate::mongo::MongoCollection;

const APP_NAME: &str = "registro";

/// Connected handle to the document store.
///
/// Cloning shares the underlying driver client.
#[derive(Debug, Clone)]
pub struct StoreGateway {
    database: Database,
    config: StoreConfig,
}

impl StoreGateway {
    /// Connect to the store described by `config`.
    ///
    /// The URI is parsed with both the connect and server-selection timeouts
    /// set to `connect_timeout_ms`, then the database is pinged under the same
    /// bound so an unreachable store fails here instead of on the first
    /// request.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] for an empty or unparseable URI or database name
    /// - [`Error::Connection`] when the ping fails or does not answer in time
    pub async fn connect(config: &StoreConfig) -> Result<Self> {
        config.validate()?;
        let connect_timeout = config.connect_timeout();

        let mut options = ClientOptions::parse(&config.uri)
            .await
            .map_err(|e| Error::config(format!("invalid store URI: {}", e)))?;
        options.app_name = Some(APP_NAME.to_string());
        options.connect_timeout = Some(connect_timeout);
        options.server_selection_timeout = Some(connect_timeout);

        let client = Client::with_options(options).map_err(Error::config)?;
        let database = client.database(&config.database);

        tokio::time::timeout(connect_timeout, database.run_command(doc! { "ping": 1 }, None))
            .await
            .map_err(|_| {
                Error::connection(format!(
                    "no answer from store within {}ms",
                    config.connect_timeout_ms
                ))
            })?
            .map_err(Error::connection)?;

        info!(
            target: "registro::store",
            database = %config.database,
            collection = %config.collection,
            "Connected to document store"
        );

        Ok(Self {
            database,
            config: config.clone(),
        })
    }

    /// Handle to a named collection.
    pub fn collection(&self, name: &str) -> MongoCollection {
        MongoCollection::new(self.database.collection(name))
    }

    /// Handle to the configured records collection.
    pub fn records(&self) -> Arc<dyn DocumentCollection> {
        Arc::new(self.collection(&self.config.collection))
    }

    /// Declare the natural-key uniqueness constraint on the records collection.
    ///
    /// No-op when `ensure_indexes` is disabled.
    pub async fn ensure_indexes(&self) -> Result<()> {
        if !self.config.ensure_indexes {
            return Ok(());
        }
        ensure_record_indexes(self.records().as_ref()).await
    }
}

/// Create the unique `cedula` index on a records collection.
pub async fn ensure_record_indexes(collection: &dyn DocumentCollection) -> Result<()> {
    collection.ensure_unique_index(fields::NATIONAL_ID).await?;
    info!(
        target: "registro::store",
        field = fields::NATIONAL_ID,
        "Natural-key uniqueness index in place"
    );
    Ok(())
}
