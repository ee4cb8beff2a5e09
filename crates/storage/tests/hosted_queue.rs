//! Hosted storage calls routed through the request queue, against a mock
//! object-storage service.

use std::sync::Arc;
use std::time::Duration;

use assert_matches::assert_matches;
use opvang_core::request_queue::RequestQueue;
use opvang_storage::{HostedStorage, ObjectStorage, StorageError};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const BUCKET: &str = "administrative-documents";
const OBJECT_PATH: &str = "/storage/v1/object/administrative-documents/IN/24191_Amir_Diallo/scan.pdf";

fn hosted(server: &MockServer, max_concurrent: usize) -> (HostedStorage, Arc<RequestQueue>) {
    let queue = Arc::new(RequestQueue::new(max_concurrent, Duration::ZERO));
    let storage = HostedStorage::new(server.uri(), "test-key".into(), Arc::clone(&queue));
    (storage, queue)
}

async fn upload_scan(storage: &HostedStorage) -> Result<(), StorageError> {
    storage
        .upload(
            BUCKET,
            "IN/24191_Amir_Diallo/scan.pdf",
            b"%PDF-1.4".to_vec(),
            "application/pdf",
        )
        .await
}

// ---------------------------------------------------------------------------
// Test: a rate-limited upload is retried once and lowers the limit
// ---------------------------------------------------------------------------

#[tokio::test]
async fn rate_limited_upload_succeeds_after_one_retry() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(OBJECT_PATH))
        .respond_with(ResponseTemplate::new(429).set_body_string("Too many requests"))
        .up_to_n_times(1)
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(OBJECT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "Key": "administrative-documents/IN/24191_Amir_Diallo/scan.pdf"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (storage, queue) = hosted(&server, 3);
    upload_scan(&storage).await.unwrap();

    let status = queue.status();
    assert_eq!(status.max_concurrent, 2);
    assert_eq!(status.active, 0);
    assert_eq!(status.queued, 0);
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

// ---------------------------------------------------------------------------
// Test: a backend that stays unavailable surfaces the 503
// ---------------------------------------------------------------------------

#[tokio::test]
async fn persistent_unavailability_surfaces_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(OBJECT_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service unavailable"))
        .expect(2)
        .mount(&server)
        .await;

    let (storage, queue) = hosted(&server, 2);
    let err = upload_scan(&storage).await.unwrap_err();

    assert_matches!(err, StorageError::Api { status: 503, .. });
    assert_eq!(queue.status().max_concurrent, 1);
    assert_eq!(queue.status().active, 0);
}

// ---------------------------------------------------------------------------
// Test: other client errors are not retried
// ---------------------------------------------------------------------------

#[tokio::test]
async fn client_error_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(OBJECT_PATH))
        .respond_with(ResponseTemplate::new(403).set_body_string("Forbidden"))
        .expect(1)
        .mount(&server)
        .await;

    let (storage, queue) = hosted(&server, 2);
    let err = upload_scan(&storage).await.unwrap_err();

    assert_matches!(err, StorageError::Api { status: 403, .. });
    assert_eq!(queue.status().max_concurrent, 2);
}
