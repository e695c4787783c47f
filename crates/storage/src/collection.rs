//! Document collection port
//!
//! The repository never talks to the driver directly; it talks to a
//! [`DocumentCollection`]. Two adapters exist:
//!
//! | Adapter | Backing | Used by |
//! |---------|---------|---------|
//! | [`MongoCollection`](crate::MongoCollection) | MongoDB driver | production |
//! | [`MemoryCollection`](crate::MemoryCollection) | in-process map | tests, `--in-memory` mode |

use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::Document;
use registro_core::{Result, UpdateOutcome};

/// A single collection of BSON documents.
///
/// Implementations must be safe to share across request tasks. None of the
/// operations retry; failures are returned as [`registro_core::Error::Store`].
#[async_trait]
pub trait DocumentCollection: Send + Sync {
    /// Apply `update` to the first document matching `filter`.
    ///
    /// Never inserts: a filter that matches nothing reports zero matches.
    async fn update_one(&self, filter: Document, update: Document) -> Result<UpdateOutcome>;

    /// First document matching `filter`, if any.
    async fn find_one(&self, filter: Document) -> Result<Option<Document>>;

    /// Insert a document, returning its identifier.
    ///
    /// A missing `_id` is generated by the store.
    async fn insert_one(&self, document: Document) -> Result<ObjectId>;

    /// Declare `field` unique across the collection.
    ///
    /// Idempotent: declaring an existing index again succeeds.
    async fn ensure_unique_index(&self, field: &str) -> Result<()>;
}
