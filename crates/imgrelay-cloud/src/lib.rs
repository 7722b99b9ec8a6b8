//! Imgrelay Cloud Library
//!
//! Abstraction over the third-party image-hosting API plus the
//! Cloudinary-protocol implementation. The API layer depends only on the
//! [`ImageHost`] trait so tests can substitute a scripted fake.

pub mod cloudinary;

use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

pub use cloudinary::CloudinaryClient;

/// Cloud operation errors
#[derive(Debug, Error)]
pub enum CloudError {
    /// Provider rejected or failed the upload; carries the provider detail.
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Listing failed: {0}")]
    ListFailed(String),

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for cloud operations
pub type CloudResult<T> = Result<T, CloudError>;

/// Parameters for one hosted upload.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// Target folder/namespace on the provider side.
    pub folder: String,
    /// Public identifier to store the asset under (without folder prefix).
    pub public_id: String,
}

/// One asset as known to the provider. Only `secure_url` is ever surfaced to
/// HTTP clients.
#[derive(Debug, Clone, Deserialize)]
pub struct HostedImage {
    pub public_id: String,
    /// HTTPS delivery URL returned by the provider.
    pub secure_url: String,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub bytes: Option<u64>,
}

/// Image-hosting provider abstraction.
///
/// Implementations upload a locally spooled file and list previously hosted
/// assets; they perform no retries and no caching.
#[async_trait]
pub trait ImageHost: Send + Sync {
    /// Upload the file at `path` and return the hosted asset descriptor.
    async fn upload(&self, path: &Path, request: &UploadRequest) -> CloudResult<HostedImage>;

    /// List hosted assets under `folder`, at most `max_results` of them.
    async fn list(&self, folder: &str, max_results: u32) -> CloudResult<Vec<HostedImage>>;
}
