use fieldsync::application::ports::{ObjectStorage, RecordFilter, RecordStore, Transcriber};
use fieldsync::infrastructure::network::{ConnectivitySignal, HttpConnectivityProbe};
use fieldsync::infrastructure::remote::{
    BackendClient, HttpObjectStorage, HttpRecordStore, HttpTranscriber,
};
use fieldsync::shared::config::BackendConfig;
use fieldsync::{AppConfig, AppError};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn backend(server: &MockServer) -> BackendConfig {
    let mut config = AppConfig::default().backend;
    config.base_url = server.uri();
    config.api_key = Some("anon-key".into());
    config.access_token = Some("user-token".into());
    config.request_timeout = 5;
    config
}

#[tokio::test]
async fn upload_posts_bytes_to_bucket_path() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/storage/v1/object/project-photos/P1/1700000000000-abc123.jpg"))
        .and(header("apikey", "anon-key"))
        .and(header("authorization", "Bearer user-token"))
        .and(header("content-type", "image/jpeg"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "Key": "project-photos/P1/1700000000000-abc123.jpg" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let config = backend(&server);
    let storage = HttpObjectStorage::new(BackendClient::new(&config).unwrap(), "project-photos");

    let stored = storage
        .upload(
            "P1/1700000000000-abc123.jpg",
            vec![1, 2, 3],
            Some("image/jpeg"),
        )
        .await
        .unwrap();
    assert_eq!(stored, "P1/1700000000000-abc123.jpg");
    assert_eq!(
        storage.public_url(&stored),
        format!(
            "{}/storage/v1/object/public/project-photos/P1/1700000000000-abc123.jpg",
            server.uri()
        )
    );
}

#[tokio::test]
async fn remove_sends_prefixes() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/storage/v1/object/project-photos"))
        .and(body_json(json!({ "prefixes": ["P1/a.jpg"] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let config = backend(&server);
    let storage = HttpObjectStorage::new(BackendClient::new(&config).unwrap(), "project-photos");
    storage.remove(&["P1/a.jpg".to_string()]).await.unwrap();
}

#[tokio::test]
async fn storage_errors_map_by_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/storage/v1/object/project-photos/P1/x.jpg"))
        .respond_with(ResponseTemplate::new(500).set_body_string("disk full"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/storage/v1/object/project-photos/P1/y.jpg"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let config = backend(&server);
    let storage = HttpObjectStorage::new(BackendClient::new(&config).unwrap(), "project-photos");

    let err = storage.upload("P1/x.jpg", vec![0], None).await.unwrap_err();
    assert!(matches!(err, AppError::Storage(ref msg) if msg.contains("disk full")));

    let err = storage.upload("P1/y.jpg", vec![0], None).await.unwrap_err();
    assert!(matches!(err, AppError::Auth(_)));
}

#[tokio::test]
async fn insert_posts_record_to_table() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/time_entry_breaks"))
        .and(body_json(json!({ "time_entry_id": "E1", "break_start": "2026-03-01T12:00:00.000Z" })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let config = backend(&server);
    let records = HttpRecordStore::new(BackendClient::new(&config).unwrap());
    records
        .insert(
            "time_entry_breaks",
            json!({ "time_entry_id": "E1", "break_start": "2026-03-01T12:00:00.000Z" }),
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn update_encodes_filters_as_query() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/time_entry_breaks"))
        .and(query_param("time_entry_id", "eq.E1"))
        .and(query_param("break_end", "is.null"))
        .and(body_json(json!({ "break_end": "2026-03-01T12:30:00.000Z" })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let config = backend(&server);
    let records = HttpRecordStore::new(BackendClient::new(&config).unwrap());
    records
        .update(
            "time_entry_breaks",
            RecordFilter::new()
                .eq("time_entry_id", "E1")
                .is_null("break_end"),
            json!({ "break_end": "2026-03-01T12:30:00.000Z" }),
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn update_without_filter_is_rejected_locally() {
    let server = MockServer::start().await;
    let config = backend(&server);
    let records = HttpRecordStore::new(BackendClient::new(&config).unwrap());

    let err = records
        .update("time_entries", RecordFilter::new(), json!({ "status": "completed" }))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn transcriber_calls_function_and_reads_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/functions/v1/transcribe-audio"))
        .and(body_json(json!({ "audio": "AQID", "mimeType": "audio/webm" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "text": "Replace flashing" })))
        .expect(1)
        .mount(&server)
        .await;

    let config = backend(&server);
    let transcriber = HttpTranscriber::new(
        BackendClient::new(&config).unwrap(),
        config.transcribe_function.clone(),
    );
    let text = transcriber.transcribe("AQID", "audio/webm").await.unwrap();
    assert_eq!(text, "Replace flashing");
}

#[tokio::test]
async fn transcriber_rejects_malformed_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/functions/v1/transcribe-audio"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "error": "no speech" })))
        .mount(&server)
        .await;

    let config = backend(&server);
    let transcriber = HttpTranscriber::new(
        BackendClient::new(&config).unwrap(),
        config.transcribe_function.clone(),
    );
    let err = transcriber.transcribe("AQID", "audio/webm").await.unwrap_err();
    assert!(matches!(err, AppError::DeserializationError(_)));
}

#[tokio::test]
async fn probe_treats_any_answer_as_online() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/v1/health"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let config = backend(&server);
    let probe = HttpConnectivityProbe::from_config(&config, Duration::from_secs(1)).unwrap();
    assert!(probe.check().await);

    let signal = ConnectivitySignal::new(false);
    signal.set_online(probe.check().await);
    assert!(signal.is_online());
}

#[tokio::test]
async fn probe_reports_offline_when_unreachable() {
    let mut config = AppConfig::default().backend;
    config.base_url = "http://127.0.0.1:9".into();
    config.request_timeout = 1;

    let probe = HttpConnectivityProbe::from_config(&config, Duration::from_secs(1)).unwrap();
    assert!(!probe.check().await);
}
