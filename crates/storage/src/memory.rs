//! In-process document collection
//!
//! `MemoryCollection` keeps documents in a `BTreeMap` keyed by `_id` behind a
//! `parking_lot::RwLock`. It understands the subset of the query language the
//! repository emits:
//!
//! - Filters: top-level equality on every filter key
//! - Updates: `$set` on top-level fields
//!
//! Anything else is rejected as a store error rather than silently ignored.
//!
//! # Atomicity
//!
//! A whole `$set` is applied under one write lock, so two concurrent updates
//! to the same document are last-writer-wins and never interleave field-wise.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::{Bson, Document};
use parking_lot::RwLock;
use registro_core::{fields, Error, Result, UpdateOutcome};

use crate::collection::DocumentCollection;

const SET_OPERATOR: &str = "$set";

#[derive(Debug, Default)]
struct Inner {
    documents: BTreeMap<ObjectId, Document>,
    unique_fields: BTreeSet<String>,
}

/// Document collection held in process memory.
#[derive(Debug, Default)]
pub struct MemoryCollection {
    inner: RwLock<Inner>,
}

impl MemoryCollection {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents
    pub fn len(&self) -> usize {
        self.inner.read().documents.len()
    }

    /// Check if the collection is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of every stored document, ordered by `_id`
    pub fn documents(&self) -> Vec<Document> {
        self.inner.read().documents.values().cloned().collect()
    }
}

fn matches(document: &Document, filter: &Document) -> bool {
    filter
        .iter()
        .all(|(key, expected)| document.get(key) == Some(expected))
}

/// Validate an update document and extract the `$set` body.
fn set_body(update: &Document) -> Result<&Document> {
    let mut body = None;
    for (operator, value) in update {
        match (operator.as_str(), value) {
            (SET_OPERATOR, Bson::Document(fields)) => body = Some(fields),
            (SET_OPERATOR, _) => {
                return Err(Error::store("update", "$set expects a document"));
            }
            (other, _) => {
                return Err(Error::store(
                    "update",
                    format!("unsupported update operator '{}'", other),
                ));
            }
        }
    }
    let body = body.ok_or_else(|| Error::store("update", "update document has no operators"))?;
    for key in body.keys() {
        if key == fields::ID {
            return Err(Error::store("update", "field '_id' is immutable"));
        }
        if key.starts_with('$') || key.contains('.') {
            return Err(Error::store(
                "update",
                format!("unsupported field path '{}'", key),
            ));
        }
    }
    Ok(body)
}

fn duplicate_key(inner: &Inner, field: &str, value: &Bson, except: Option<&ObjectId>) -> bool {
    inner
        .documents
        .iter()
        .filter(|(id, _)| Some(*id) != except)
        .any(|(_, doc)| doc.get(field) == Some(value))
}

#[async_trait]
impl DocumentCollection for MemoryCollection {
    async fn update_one(&self, filter: Document, update: Document) -> Result<UpdateOutcome> {
        let body = set_body(&update)?;

        let mut inner = self.inner.write();
        let target = inner
            .documents
            .iter()
            .find(|(_, doc)| matches(doc, &filter))
            .map(|(id, _)| *id);
        let Some(id) = target else {
            return Ok(UpdateOutcome::not_found());
        };

        for (key, value) in body {
            if inner.unique_fields.contains(key) && duplicate_key(&inner, key, value, Some(&id)) {
                return Err(Error::store(
                    "update",
                    format!("duplicate key on unique field '{}'", key),
                ));
            }
        }

        let document = inner
            .documents
            .get_mut(&id)
            .ok_or_else(|| Error::store("update", "document vanished under write lock"))?;
        let mut modified = false;
        for (key, value) in body {
            if document.get(key) != Some(value) {
                document.insert(key.clone(), value.clone());
                modified = true;
            }
        }
        Ok(UpdateOutcome::new(1, u64::from(modified)))
    }

    async fn find_one(&self, filter: Document) -> Result<Option<Document>> {
        let inner = self.inner.read();
        Ok(inner
            .documents
            .values()
            .find(|doc| matches(doc, &filter))
            .cloned())
    }

    async fn insert_one(&self, mut document: Document) -> Result<ObjectId> {
        let id = match document.get(fields::ID) {
            Some(Bson::ObjectId(id)) => *id,
            Some(_) => return Err(Error::store("insert", "_id must be an ObjectId")),
            None => {
                let id = ObjectId::new();
                document.insert(fields::ID, id);
                id
            }
        };

        let mut inner = self.inner.write();
        if inner.documents.contains_key(&id) {
            return Err(Error::store("insert", format!("duplicate _id {}", id)));
        }
        for field in &inner.unique_fields {
            if let Some(value) = document.get(field) {
                if duplicate_key(&inner, field, value, None) {
                    return Err(Error::store(
                        "insert",
                        format!("duplicate key on unique field '{}'", field),
                    ));
                }
            }
        }
        inner.documents.insert(id, document);
        Ok(id)
    }

    async fn ensure_unique_index(&self, field: &str) -> Result<()> {
        let mut inner = self.inner.write();
        let mut seen = Vec::new();
        for doc in inner.documents.values() {
            if let Some(value) = doc.get(field) {
                if seen.contains(&value) {
                    return Err(Error::store(
                        "create_index",
                        format!("existing documents share a value for '{}'", field),
                    ));
                }
                seen.push(value);
            }
        }
        inner.unique_fields.insert(field.to_string());
        Ok(())
    }
}
