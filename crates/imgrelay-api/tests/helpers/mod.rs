#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum_test::TestServer;
use imgrelay_api::setup::routes::setup_routes;
use imgrelay_api::state::AppState;
use imgrelay_cloud::{CloudError, CloudResult, HostedImage, ImageHost, UploadRequest};
use imgrelay_core::Config;
use imgrelay_storage::SpoolDir;
use tempfile::TempDir;

/// Scripted stand-in for the cloud provider.
///
/// Counts upload calls, can be told to fail the upload whose file content
/// matches `fail_on_content`, and serves a canned listing. Uploaded URLs
/// embed the public id and the file content so tests can assert ordering and
/// distinctness.
pub struct MockHost {
    upload_calls: AtomicUsize,
    fail_on_content: Option<&'static str>,
    listing: Vec<HostedImage>,
    fail_listing: bool,
}

impl MockHost {
    pub fn new() -> Self {
        Self {
            upload_calls: AtomicUsize::new(0),
            fail_on_content: None,
            listing: Vec::new(),
            fail_listing: false,
        }
    }

    /// Fail the upload of the file whose body equals `content`.
    pub fn failing_on(content: &'static str) -> Self {
        Self {
            fail_on_content: Some(content),
            ..Self::new()
        }
    }

    pub fn with_listing(listing: Vec<HostedImage>) -> Self {
        Self {
            listing,
            ..Self::new()
        }
    }

    pub fn with_failing_listing() -> Self {
        Self {
            fail_listing: true,
            ..Self::new()
        }
    }

    pub fn upload_calls(&self) -> usize {
        self.upload_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageHost for MockHost {
    async fn upload(&self, path: &Path, request: &UploadRequest) -> CloudResult<HostedImage> {
        self.upload_calls.fetch_add(1, Ordering::SeqCst);

        let content = tokio::fs::read_to_string(path).await?;

        if self.fail_on_content == Some(content.as_str()) {
            return Err(CloudError::UploadFailed(
                "status 500: simulated provider outage".to_string(),
            ));
        }

        Ok(HostedImage {
            public_id: format!("{}/{}", request.folder, request.public_id),
            secure_url: format!(
                "https://res.example-cdn.test/{}/{}/{}",
                request.folder, request.public_id, content
            ),
            format: None,
            bytes: Some(content.len() as u64),
        })
    }

    async fn list(&self, _folder: &str, _max_results: u32) -> CloudResult<Vec<HostedImage>> {
        if self.fail_listing {
            return Err(CloudError::ListFailed(
                "status 503: simulated provider outage".to_string(),
            ));
        }
        Ok(self.listing.clone())
    }
}

pub fn hosted(name: &str) -> HostedImage {
    HostedImage {
        public_id: format!("imgrelay/{}", name),
        secure_url: format!("https://res.example-cdn.test/imgrelay/{}", name),
        format: Some("jpg".to_string()),
        bytes: Some(3),
    }
}

pub struct TestApp {
    pub server: TestServer,
    pub host: Arc<MockHost>,
    upload_dir: TempDir,
}

impl TestApp {
    /// Files currently sitting in the spool directory.
    pub fn spooled_files(&self) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = std::fs::read_dir(self.upload_dir.path())
            .expect("read spool dir")
            .map(|entry| entry.expect("dir entry").path())
            .collect();
        files.sort();
        files
    }
}

/// Setup a test application with default limits and an isolated spool dir.
pub async fn setup_test_app(host: MockHost) -> TestApp {
    setup_test_app_with_limits(host, 100 * 1024 * 1024, 25).await
}

pub async fn setup_test_app_with_limits(
    host: MockHost,
    max_upload_bytes: usize,
    max_files: usize,
) -> TestApp {
    let upload_dir = TempDir::new().expect("create temp upload dir");

    let config = Config {
        server_port: 0,
        cloud_name: "demo".to_string(),
        api_key: "key".to_string(),
        api_secret: "secret".to_string(),
        cloud_folder: "imgrelay".to_string(),
        upload_dir: upload_dir.path().display().to_string(),
        max_upload_bytes,
        max_files,
        allowed_extensions: vec![
            "jpeg".to_string(),
            "jpg".to_string(),
            "png".to_string(),
            "webp".to_string(),
            "gif".to_string(),
        ],
        allowed_content_types: vec![
            "image/jpeg".to_string(),
            "image/png".to_string(),
            "image/webp".to_string(),
            "image/gif".to_string(),
        ],
    };

    let host = Arc::new(host);
    let spool = SpoolDir::new(upload_dir.path())
        .await
        .expect("create spool dir");
    let state = Arc::new(AppState::new(
        &config,
        host.clone() as Arc<dyn ImageHost>,
        spool,
    ));

    let server = TestServer::new(setup_routes(state)).expect("start test server");

    TestApp {
        server,
        host,
        upload_dir,
    }
}
