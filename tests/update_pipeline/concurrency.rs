//! Concurrent requests against one key.

use axum::http::StatusCode;
use registro::RecordUpdate;

use crate::{ana, original, TestApp, ANA_JSON};

const BEA_JSON: &str =
    r#"{"nombre":"Bea","telefono":"777","direccion":"Calle 2","correo":"bea@x.com"}"#;

fn bea() -> RecordUpdate {
    RecordUpdate {
        name: "Bea".to_string(),
        phone: "777".to_string(),
        address: "Calle 2".to_string(),
        email: "bea@x.com".to_string(),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn racing_requests_leave_one_whole_payload() {
    let t = std::sync::Arc::new(TestApp::new().await);
    t.seed("12345", original()).await;

    let mut handles = Vec::new();
    for i in 0..50 {
        let t = t.clone();
        let body = if i % 2 == 0 { ANA_JSON } else { BEA_JSON };
        handles.push(tokio::spawn(async move { t.put("12345", body).await }));
    }
    for handle in handles {
        let (status, _) = handle.await.unwrap();
        assert_eq!(status, StatusCode::OK);
    }

    let written = t.stored("12345").await.unwrap().mutable_fields();
    assert!(written == ana() || written == bea(), "interleaved: {:?}", written);
    assert_eq!(t.records.len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn independent_keys_update_in_parallel() {
    let t = std::sync::Arc::new(TestApp::new().await);
    for i in 0..20 {
        t.seed(&format!("id-{}", i), original()).await;
    }

    let mut handles = Vec::new();
    for i in 0..20 {
        let t = t.clone();
        handles.push(tokio::spawn(async move {
            let body = format!(r#"{{"nombre":"user {}"}}"#, i);
            t.put(&format!("id-{}", i), &body).await
        }));
    }
    for handle in handles {
        assert_eq!(handle.await.unwrap().0, StatusCode::OK);
    }

    for i in 0..20 {
        let stored = t.stored(&format!("id-{}", i)).await.unwrap();
        assert_eq!(stored.name, format!("user {}", i));
    }
}
