//! MongoDB-backed collection.

use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::Document;
use mongodb::options::{IndexOptions, UpdateOptions};
use mongodb::{Collection, IndexModel};
use registro_core::{Error, Result, UpdateOutcome};
use tracing::debug;

use crate::collection::DocumentCollection;

/// Collection handle from the MongoDB driver.
///
/// Cloning is cheap; the driver client behind it is reference counted.
#[derive(Debug, Clone)]
pub struct MongoCollection {
    inner: Collection<Document>,
}

impl MongoCollection {
    /// Wrap a driver collection.
    pub fn new(inner: Collection<Document>) -> Self {
        Self { inner }
    }

    /// Drop the whole collection.
    pub async fn drop_collection(&self) -> Result<()> {
        self.inner
            .drop(None)
            .await
            .map_err(|e| Error::store("drop", e))
    }
}

#[async_trait]
impl DocumentCollection for MongoCollection {
    async fn update_one(&self, filter: Document, update: Document) -> Result<UpdateOutcome> {
        let options = UpdateOptions::builder().upsert(false).build();
        let result = self
            .inner
            .update_one(filter, update, options)
            .await
            .map_err(|e| Error::store("update", e))?;
        Ok(UpdateOutcome::new(result.matched_count, result.modified_count))
    }

    async fn find_one(&self, filter: Document) -> Result<Option<Document>> {
        self.inner
            .find_one(filter, None)
            .await
            .map_err(|e| Error::store("find", e))
    }

    async fn insert_one(&self, document: Document) -> Result<ObjectId> {
        let result = self
            .inner
            .insert_one(document, None)
            .await
            .map_err(|e| Error::store("insert", e))?;
        result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| Error::store("insert", "store returned a non-ObjectId identifier"))
    }

    async fn ensure_unique_index(&self, field: &str) -> Result<()> {
        let options = IndexOptions::builder().unique(true).build();
        let mut keys = Document::new();
        keys.insert(field, 1);
        let model = IndexModel::builder()
            .keys(keys)
            .options(options)
            .build();
        let created = self
            .inner
            .create_index(model, None)
            .await
            .map_err(|e| Error::store("create_index", e))?;
        debug!(
            target: "registro::store",
            collection = self.inner.name(),
            index = %created.index_name,
            "Unique index ensured"
        );
        Ok(())
    }
}
