//! Request-to-store scenarios.

use axum::http::StatusCode;
use registro::RecordUpdate;

use crate::{ana, original, TestApp, ANA_JSON};

#[tokio::test]
async fn update_existing_record() {
    let t = TestApp::new().await;
    let id = t.seed("12345", original()).await;

    let (status, body) = t.put("12345", ANA_JSON).await;
    assert_eq!(status, StatusCode::OK);
    let value: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert!(value["message"].is_string());

    let stored = t.stored("12345").await.unwrap();
    assert_eq!(stored.mutable_fields(), ana());
    assert_eq!(stored.id, Some(id));
    assert_eq!(stored.national_id, "12345");
}

#[tokio::test]
async fn absent_record_is_not_found_and_not_created() {
    let t = TestApp::new().await;
    t.seed("12345", original()).await;

    let (status, _) = t.put("99999", ANA_JSON).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(t.stored("99999").await.is_none());
    assert_eq!(t.records.len(), 1);

    // The existing record is untouched
    assert_eq!(t.stored("12345").await.unwrap().mutable_fields(), original());
}

#[tokio::test]
async fn malformed_body_leaves_store_untouched() {
    let t = TestApp::new().await;
    t.seed("12345", original()).await;
    let before = t.records.documents();

    for body in ["", "{", "[1,2]", r#"{"nombre": 7}"#, r#""Ana""#] {
        let (status, _) = t.put("12345", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {:?}", body);
    }
    assert_eq!(t.records.documents(), before);
}

#[tokio::test]
async fn json_body_is_accepted_whatever_the_content_type() {
    for content_type in [None, Some("application/x-www-form-urlencoded"), Some("text/plain")] {
        let t = TestApp::new().await;
        t.seed("12345", original()).await;

        let (status, _) = t.put_as("12345", ANA_JSON, content_type).await;
        assert_eq!(status, StatusCode::OK, "content type: {:?}", content_type);
        assert_eq!(t.stored("12345").await.unwrap().mutable_fields(), ana());
    }
}

#[tokio::test]
async fn capitalised_keys_update_their_fields() {
    let t = TestApp::new().await;
    t.seed("12345", original()).await;

    let (status, _) = t
        .put(
            "12345",
            r#"{"Nombre":"Ana","Telefono":"555","Direccion":"Calle 1","Correo":"ana@x.com"}"#,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(t.stored("12345").await.unwrap().mutable_fields(), ana());
}

#[tokio::test]
async fn null_field_overwrites_with_empty_string() {
    let t = TestApp::new().await;
    t.seed("12345", original()).await;

    let (status, _) = t
        .put("12345", r#"{"nombre":"Ana","telefono":null}"#)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        t.stored("12345").await.unwrap().mutable_fields(),
        RecordUpdate {
            name: "Ana".to_string(),
            ..RecordUpdate::default()
        }
    );
}

#[tokio::test]
async fn null_body_clears_mutable_fields() {
    let t = TestApp::new().await;
    t.seed("12345", original()).await;

    let (status, _) = t.put("12345", "null").await;
    assert_eq!(status, StatusCode::OK);
    let stored = t.stored("12345").await.unwrap();
    assert_eq!(stored.mutable_fields(), RecordUpdate::default());
    assert_eq!(stored.national_id, "12345");
}

#[tokio::test]
async fn omitted_fields_overwrite_with_empty_strings() {
    let t = TestApp::new().await;
    t.seed("12345", original()).await;

    let (status, _) = t.put("12345", r#"{"nombre":"Ana"}"#).await;
    assert_eq!(status, StatusCode::OK);

    let stored = t.stored("12345").await.unwrap();
    assert_eq!(
        stored.mutable_fields(),
        RecordUpdate {
            name: "Ana".to_string(),
            ..RecordUpdate::default()
        }
    );
}

#[tokio::test]
async fn body_cannot_move_the_natural_key() {
    let t = TestApp::new().await;
    t.seed("12345", original()).await;

    let (status, _) = t
        .put("12345", r#"{"cedula":"55555","_id":"x","nombre":"Ana"}"#)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(t.stored("55555").await.is_none());
    assert_eq!(t.stored("12345").await.unwrap().name, "Ana");
}

#[tokio::test]
async fn repeating_an_update_is_idempotent() {
    let t = TestApp::new().await;
    t.seed("12345", original()).await;

    let (first, _) = t.put("12345", ANA_JSON).await;
    let after_once = t.records.documents();
    let (second, _) = t.put("12345", ANA_JSON).await;

    assert_eq!(first, StatusCode::OK);
    assert_eq!(second, StatusCode::OK);
    assert_eq!(t.records.documents(), after_once);
}

#[tokio::test]
async fn only_the_addressed_record_changes() {
    let t = TestApp::new().await;
    t.seed("12345", original()).await;
    t.seed("67890", original()).await;

    t.put("12345", ANA_JSON).await;

    assert_eq!(t.stored("12345").await.unwrap().mutable_fields(), ana());
    assert_eq!(t.stored("67890").await.unwrap().mutable_fields(), original());
}
