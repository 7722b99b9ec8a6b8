//! Application state
//!
//! Built once at startup from the immutable configuration and shared across
//! requests behind an `Arc`. Nothing in here is mutable; requests never
//! communicate through state.

use std::sync::Arc;

use imgrelay_cloud::ImageHost;
use imgrelay_core::{Config, UploadValidator};
use imgrelay_storage::SpoolDir;

pub struct AppState {
    /// Allow-list validator for incoming parts.
    pub validator: UploadValidator,
    /// Maximum number of file parts per request.
    pub max_files: usize,
    /// Total request-body ceiling in bytes.
    pub max_upload_bytes: usize,
    /// Provider folder all uploads land in.
    pub cloud_folder: String,
    /// Image-hosting provider client.
    pub host: Arc<dyn ImageHost>,
    /// Local spool for transient persistence between parse and upload.
    pub spool: SpoolDir,
}

impl AppState {
    pub fn new(config: &Config, host: Arc<dyn ImageHost>, spool: SpoolDir) -> Self {
        Self {
            validator: UploadValidator::new(
                config.allowed_extensions.clone(),
                config.allowed_content_types.clone(),
            ),
            max_files: config.max_files,
            max_upload_bytes: config.max_upload_bytes,
            cloud_folder: config.cloud_folder.clone(),
            host,
            spool,
        }
    }
}
