//! End-to-end batch tests against a mock Frappe site.
//!
//! These exercise the real HTTP client and the sequential batch loop
//! together, asserting the wire contract: one POST per file, the Frappe
//! `message` envelope, token auth and the manual-mode argument shape.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use invoice2erpnext::services::SettingsService;
use invoice2erpnext::{
    run_batch, BatchOptions, Config, ConversionService, ConvertMode, FrappeClient, LogProgress,
    ManualSelection, UploadedFile,
};

const CONVERT_PATH: &str =
    "/api/method/invoice2erpnext.invoice2erpnext.doctype.invoice2erpnext_log.invoice2erpnext_log.create_purchase_invoice_from_file";

fn test_config(server: &MockServer) -> Config {
    Config {
        base_url: server.uri(),
        api_key: "key".to_string(),
        api_secret: "secret".to_string(),
        ..Config::default()
    }
}

fn sample_files(n: usize) -> Vec<UploadedFile> {
    (0..n)
        .map(|i| UploadedFile {
            name: format!("FILE-{:04}", i),
            file_name: format!("invoice-{}.pdf", i),
            file_url: Some(format!("/files/invoice-{}.pdf", i)),
        })
        .collect()
}

fn fast_options() -> BatchOptions {
    BatchOptions {
        dismiss_delay: Duration::from_millis(0),
        ..BatchOptions::default()
    }
}

#[tokio::test]
async fn test_auto_batch_converts_three_files() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(CONVERT_PATH))
        .and(header("authorization", "token key:secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": { "success": true, "document_id": "ACC-PINV-2025-00001" }
        })))
        .expect(3)
        .mount(&server)
        .await;

    let client = Arc::new(FrappeClient::new(&test_config(&server)));
    let converter = ConversionService::new(client);

    let report = run_batch(
        &converter,
        &sample_files(3),
        ConvertMode::Auto,
        None,
        &LogProgress::new(),
        &fast_options(),
    )
    .await
    .unwrap();

    assert_eq!(report.total, 3);
    assert_eq!(report.processed, 3);
    assert_eq!(report.succeeded, 3);

    // Auto mode sends the file reference and mode, nothing else.
    for request in server.received_requests().await.unwrap() {
        let body: Value = serde_json::from_slice(&request.body).unwrap();
        assert_eq!(body["mode"], "auto");
        assert!(body["file_doc_name"].as_str().unwrap().starts_with("FILE-"));
        assert!(body.get("supplier").is_none());
        assert!(body.get("item").is_none());
    }
}

#[tokio::test]
async fn test_manual_batch_sends_identical_selection() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(CONVERT_PATH))
        .and(body_partial_json(json!({
            "mode": "manual",
            "supplier": "SUP-0001",
            "item": "ITEM-0001",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": { "success": true, "document_id": "ACC-PINV-2025-00002" }
        })))
        .expect(2)
        .mount(&server)
        .await;

    let client = Arc::new(FrappeClient::new(&test_config(&server)));
    let converter = ConversionService::new(client);
    let selection = ManualSelection::new("SUP-0001", "ITEM-0001");

    let report = run_batch(
        &converter,
        &sample_files(2),
        ConvertMode::Manual,
        Some(&selection),
        &LogProgress::new(),
        &fast_options(),
    )
    .await
    .unwrap();

    assert_eq!(report.processed, 2);
}

#[tokio::test]
async fn test_server_error_still_counts_under_legacy_semantics() {
    let server = MockServer::start().await;
    // First call blows up server-side, the rest succeed.
    Mock::given(method("POST"))
        .and(path(CONVERT_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(CONVERT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "I2E-LOG-00010"
        })))
        .expect(2)
        .mount(&server)
        .await;

    let client = Arc::new(FrappeClient::new(&test_config(&server)));
    let converter = ConversionService::new(client);

    let report = run_batch(
        &converter,
        &sample_files(3),
        ConvertMode::Auto,
        None,
        &LogProgress::new(),
        &fast_options(),
    )
    .await
    .unwrap();

    assert_eq!(report.attempted, 3);
    assert_eq!(report.failed, 1);
    // The original client never told failures and successes apart.
    assert_eq!(report.processed, 3);
}

#[tokio::test]
async fn test_settings_gate_and_credits() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/method/invoice2erpnext.utils.check_settings_enabled"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": 1 })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(
            "/api/method/invoice2erpnext.invoice2erpnext.doctype.invoice2erpnext_settings.invoice2erpnext_settings.get_available_credits",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": { "value": 37.5 }
        })))
        .mount(&server)
        .await;

    let client = Arc::new(FrappeClient::new(&test_config(&server)));
    let settings = SettingsService::new(client);

    assert!(settings.check_enabled().await.unwrap());
    assert_eq!(settings.available_credits().await.unwrap(), Some(37.5));
}

#[tokio::test]
async fn test_upload_file_returns_file_doc_reference() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/method/upload_file"))
        .and(header("authorization", "token key:secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": {
                "name": "FILE-0042",
                "file_name": "invoice.pdf",
                "file_url": "/files/invoice.pdf"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = std::env::temp_dir().join(format!("i2e-upload-test-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let file_path = dir.join("invoice.pdf");
    std::fs::write(&file_path, b"%PDF-1.4 test").unwrap();

    let client = FrappeClient::new(&test_config(&server));
    let uploaded = client.upload_file(&file_path).await.unwrap();

    assert_eq!(uploaded.name, "FILE-0042");
    assert_eq!(uploaded.file_name, "invoice.pdf");
    assert_eq!(uploaded.file_url.as_deref(), Some("/files/invoice.pdf"));

    std::fs::remove_dir_all(&dir).unwrap();
}
