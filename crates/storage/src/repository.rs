//! Record repository
//!
//! Translates a natural-key update into a filter plus `$set` document and
//! runs it against a [`DocumentCollection`] under the operation timeout.
//!
//! ## Update semantics
//!
//! All four mutable fields are written on every update, including empty
//! strings. "Partial" means a fixed subset of field names, not a subset of
//! present values: an omitted JSON key and an explicit `""` both overwrite
//! the stored value. `_id` and `cedula` are never written.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use bson::{doc, Document};
use registro_core::{fields, Error, NationalId, Record, RecordUpdate, Result, UpdateOutcome};
use tracing::{debug, warn};

use crate::collection::DocumentCollection;
use crate::config::StoreConfig;

/// Filter selecting the record whose `cedula` equals `national_id`.
pub fn national_id_filter(national_id: &NationalId) -> Document {
    let mut filter = Document::new();
    filter.insert(fields::NATIONAL_ID, national_id.as_str());
    filter
}

/// Update document setting the four mutable fields from `update`.
pub fn set_document(update: &RecordUpdate) -> Document {
    let mut set = Document::new();
    for (field, value) in update.assignments() {
        set.insert(field, value);
    }
    doc! { "$set": set }
}

/// Repository over the records collection.
///
/// Cheap to clone; clones share the collection handle.
#[derive(Clone)]
pub struct RecordRepository {
    collection: Arc<dyn DocumentCollection>,
    operation_timeout: Duration,
}

impl RecordRepository {
    /// Create a repository over `collection`, bounding each call by
    /// `operation_timeout`.
    pub fn new(collection: Arc<dyn DocumentCollection>, operation_timeout: Duration) -> Self {
        Self {
            collection,
            operation_timeout,
        }
    }

    /// Create a repository using the timeout from `config`.
    pub fn from_config(collection: Arc<dyn DocumentCollection>, config: &StoreConfig) -> Self {
        Self::new(collection, config.operation_timeout())
    }

    /// Overwrite the mutable fields of the record keyed by `national_id`.
    ///
    /// Returns `matched == 0` when no record has that key; nothing is
    /// created in that case.
    ///
    /// # Errors
    ///
    /// - [`Error::Store`] when the store rejects or fails the update
    /// - [`Error::Timeout`] when the store does not answer in time
    pub async fn update_by_national_id(
        &self,
        national_id: &NationalId,
        update: &RecordUpdate,
    ) -> Result<UpdateOutcome> {
        let filter = national_id_filter(national_id);
        let set = set_document(update);

        debug!(
            target: "registro::repository",
            cedula = %national_id,
            filter = %filter,
            update = %set,
            "Updating record by national id"
        );

        let result = self
            .bounded("update", self.collection.update_one(filter, set))
            .await;

        match &result {
            Ok(outcome) => debug!(
                target: "registro::repository",
                cedula = %national_id,
                matched = outcome.matched,
                modified = outcome.modified,
                "Record update applied"
            ),
            Err(e) => warn!(
                target: "registro::repository",
                cedula = %national_id,
                error = %e,
                "Record update failed"
            ),
        }
        result
    }

    /// Look up the record keyed by `national_id`.
    pub async fn find_by_national_id(&self, national_id: &NationalId) -> Result<Option<Record>> {
        let filter = national_id_filter(national_id);
        let found = self
            .bounded("find", self.collection.find_one(filter))
            .await?;
        found
            .map(|doc| bson::from_document(doc).map_err(Error::from))
            .transpose()
    }

    /// Run `op` under the operation timeout. The pending store call is
    /// dropped when the timeout fires.
    async fn bounded<T, F>(&self, operation: &'static str, op: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        tokio::time::timeout(self.operation_timeout, op)
            .await
            .map_err(|_| Error::timeout(operation, self.operation_timeout))?
    }
}

impl std::fmt::Debug for RecordRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordRepository")
            .field("operation_timeout", &self.operation_timeout)
            .finish_non_exhaustive()
    }
}
