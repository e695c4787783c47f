//! Update Pipeline Test Suite
//!
//! Drives the full stack (router -> service -> repository -> collection)
//! over the in-memory collection.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test update_pipeline
//!
//! # Concurrency tests only
//! cargo test --test update_pipeline concurrency::
//! ```

use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use registro::{
    build_app, DocumentCollection, MemoryCollection, NationalId, ObjectId, Record,
    RecordRepository, RecordUpdate, StoreConfig,
};
use tower::ServiceExt;

mod concurrency;
mod end_to_end;

// ============================================================================
// TestApp - router over a seeded in-memory collection
// ============================================================================

/// Full application over an in-memory collection.
pub struct TestApp {
    pub records: Arc<MemoryCollection>,
    pub app: Router,
}

impl TestApp {
    /// Application with an empty collection and the unique `cedula` index.
    pub async fn new() -> Self {
        let records = Arc::new(MemoryCollection::new());
        records.ensure_unique_index("cedula").await.unwrap();
        let app = build_app(records.clone(), &StoreConfig::default());
        TestApp { records, app }
    }

    /// Insert a record and return its store identity.
    pub async fn seed(&self, national_id: &str, fields: RecordUpdate) -> ObjectId {
        let record = Record::new(national_id, fields);
        self.records
            .insert_one(bson::to_document(&record).unwrap())
            .await
            .unwrap()
    }

    /// Stored record for `national_id`, if any.
    pub async fn stored(&self, national_id: &str) -> Option<Record> {
        RecordRepository::new(self.records.clone(), Duration::from_secs(5))
            .find_by_national_id(&NationalId::from(national_id))
            .await
            .unwrap()
    }

    /// `PUT /update/update-by-cedula/{national_id}` with a JSON body.
    pub async fn put(&self, national_id: &str, body: &str) -> (StatusCode, String) {
        self.put_as(national_id, body, Some("application/json"))
            .await
    }

    /// PUT with an arbitrary `Content-Type`, or none at all.
    pub async fn put_as(
        &self,
        national_id: &str,
        body: &str,
        content_type: Option<&str>,
    ) -> (StatusCode, String) {
        let mut builder = Request::builder()
            .method(Method::PUT)
            .uri(format!("/update/update-by-cedula/{}", national_id));
        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        let request = builder
            .body(Body::from(body.to_string()))
            .unwrap_or_else(|err| panic!("failed to build request: {err}"));

        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .unwrap_or_else(|err| panic!("router request failed: {err}"));
        let status = response.status();
        let bytes = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .unwrap_or_else(|err| panic!("failed to read response body: {err}"));
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }
}

/// Fields of the record before any update.
pub fn original() -> RecordUpdate {
    RecordUpdate {
        name: "Old".to_string(),
        phone: "000".to_string(),
        address: "Nowhere".to_string(),
        email: "old@x.com".to_string(),
    }
}

/// Fields matching [`ANA_JSON`].
pub fn ana() -> RecordUpdate {
    RecordUpdate {
        name: "Ana".to_string(),
        phone: "555".to_string(),
        address: "Calle 1".to_string(),
        email: "ana@x.com".to_string(),
    }
}

pub const ANA_JSON: &str =
    r#"{"nombre":"Ana","telefono":"555","direccion":"Calle 1","correo":"ana@x.com"}"#;
