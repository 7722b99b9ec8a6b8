mod helpers;

use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use helpers::{setup_test_app, setup_test_app_with_limits, MockHost};
use serde_json::Value;

fn image_part(filename: &str, mime: &str, content: &str) -> Part {
    Part::bytes(content.as_bytes().to_vec())
        .file_name(filename)
        .mime_type(mime)
}

#[tokio::test]
async fn test_upload_single_file() {
    let app = setup_test_app(MockHost::new()).await;

    let form = MultipartForm::new().add_part("files", image_part("a.jpg", "image/jpeg", "one"));
    let response = app.server.post("/upload").multipart(form).await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["message"], "Files uploaded successfully!");

    let files = body["files"].as_array().unwrap();
    assert_eq!(files.len(), 1);
    assert!(files[0].as_str().unwrap().starts_with("https://"));

    assert_eq!(app.host.upload_calls(), 1);
    // spool copy removed after the successful upload
    assert!(app.spooled_files().is_empty());
}

#[tokio::test]
async fn test_upload_many_files_one_url_each_in_input_order() {
    let app = setup_test_app(MockHost::new()).await;

    let form = MultipartForm::new()
        .add_part("files", image_part("a.jpg", "image/jpeg", "one"))
        .add_part("files", image_part("b.png", "image/png", "two"))
        .add_part("files", image_part("c.gif", "image/gif", "three"));
    let response = app.server.post("/upload").multipart(form).await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    let files = body["files"].as_array().unwrap();

    assert_eq!(files.len(), 3);
    assert!(files[0].as_str().unwrap().ends_with("/one"));
    assert!(files[1].as_str().unwrap().ends_with("/two"));
    assert!(files[2].as_str().unwrap().ends_with("/three"));

    assert_eq!(app.host.upload_calls(), 3);
    assert!(app.spooled_files().is_empty());
}

#[tokio::test]
async fn test_upload_accepts_file_field_name() {
    let app = setup_test_app(MockHost::new()).await;

    let form = MultipartForm::new().add_part("file", image_part("a.webp", "image/webp", "one"));
    let response = app.server.post("/upload").multipart(form).await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(app.host.upload_calls(), 1);
}

#[tokio::test]
async fn test_upload_no_files_is_rejected_without_cloud_call() {
    let app = setup_test_app(MockHost::new()).await;

    let form = MultipartForm::new().add_text("note", "not a file");
    let response = app.server.post("/upload").multipart(form).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["message"], "No files selected!");

    assert_eq!(app.host.upload_calls(), 0);
    assert!(app.spooled_files().is_empty());
}

#[tokio::test]
async fn test_upload_unknown_field_names_are_ignored() {
    let app = setup_test_app(MockHost::new()).await;

    let form = MultipartForm::new().add_part("avatar", image_part("a.jpg", "image/jpeg", "one"));
    let response = app.server.post("/upload").multipart(form).await;

    // nothing arrived under a file field, so the request carries no files
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(app.host.upload_calls(), 0);
}

#[tokio::test]
async fn test_upload_disallowed_extension_rejects_whole_request() {
    let app = setup_test_app(MockHost::new()).await;

    let form = MultipartForm::new()
        .add_part("files", image_part("a.jpg", "image/jpeg", "one"))
        .add_part("files", image_part("notes.txt", "text/plain", "two"));
    let response = app.server.post("/upload").multipart(form).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    // no cloud call for any part, and nothing persisted
    assert_eq!(app.host.upload_calls(), 0);
    assert!(app.spooled_files().is_empty());
}

#[tokio::test]
async fn test_upload_disallowed_content_type_is_rejected() {
    let app = setup_test_app(MockHost::new()).await;

    let form = MultipartForm::new().add_part("files", image_part("a.png", "text/plain", "one"));
    let response = app.server.post("/upload").multipart(form).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(app.host.upload_calls(), 0);
}

#[tokio::test]
async fn test_upload_mismatched_extension_and_content_type_is_rejected() {
    let app = setup_test_app(MockHost::new()).await;

    let form = MultipartForm::new().add_part("files", image_part("a.png", "image/jpeg", "one"));
    let response = app.server.post("/upload").multipart(form).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(app.host.upload_calls(), 0);
}

#[tokio::test]
async fn test_upload_too_many_files_is_rejected() {
    let app = setup_test_app_with_limits(MockHost::new(), 100 * 1024 * 1024, 2).await;

    let form = MultipartForm::new()
        .add_part("files", image_part("a.jpg", "image/jpeg", "one"))
        .add_part("files", image_part("b.jpg", "image/jpeg", "two"))
        .add_part("files", image_part("c.jpg", "image/jpeg", "three"));
    let response = app.server.post("/upload").multipart(form).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(app.host.upload_calls(), 0);
}

#[tokio::test]
async fn test_upload_oversized_body_rejected_before_persisting() {
    let app = setup_test_app_with_limits(MockHost::new(), 1024, 25).await;

    let big = "x".repeat(8 * 1024);
    let form = MultipartForm::new().add_part("files", image_part("a.jpg", "image/jpeg", &big));
    let response = app.server.post("/upload").multipart(form).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(app.host.upload_calls(), 0);
    assert!(app.spooled_files().is_empty());
}

#[tokio::test]
async fn test_upload_repeat_produces_distinct_urls() {
    let app = setup_test_app(MockHost::new()).await;

    let mut urls = Vec::new();
    for _ in 0..2 {
        let form = MultipartForm::new().add_part("files", image_part("a.jpg", "image/jpeg", "same"));
        let response = app.server.post("/upload").multipart(form).await;
        assert_eq!(response.status_code(), StatusCode::OK);

        let body: Value = response.json();
        urls.push(body["files"][0].as_str().unwrap().to_string());
    }

    // no deduplication: each upload lands under a fresh public id
    assert_ne!(urls[0], urls[1]);
    assert_eq!(app.host.upload_calls(), 2);
}

#[tokio::test]
async fn test_upload_failure_on_one_file_fails_batch_without_rollback() {
    let app = setup_test_app(MockHost::failing_on("two")).await;

    let form = MultipartForm::new()
        .add_part("files", image_part("a.jpg", "image/jpeg", "one"))
        .add_part("files", image_part("b.jpg", "image/jpeg", "two"))
        .add_part("files", image_part("c.jpg", "image/jpeg", "three"));
    let response = app.server.post("/upload").multipart(form).await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["message"], "Cloud upload failed");

    let detail = body["error"].as_str().unwrap();
    assert!(detail.contains("b.jpg"));
    assert!(detail.contains("simulated provider outage"));

    // every upload was attempted; siblings are not cancelled or rolled back
    assert_eq!(app.host.upload_calls(), 3);

    // successful parts had their spool copies removed; the failed part's
    // copy stays behind
    let leftover = app.spooled_files();
    assert_eq!(leftover.len(), 1);
    let content = std::fs::read_to_string(&leftover[0]).unwrap();
    assert_eq!(content, "two");
}

#[tokio::test]
async fn test_health() {
    let app = setup_test_app(MockHost::new()).await;

    let response = app.server.get("/health").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
}
