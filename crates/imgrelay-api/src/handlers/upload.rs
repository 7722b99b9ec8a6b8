use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;

use crate::error::HttpAppError;
use crate::services::UploadService;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: String,
    /// Secure HTTPS URLs, one per input file, in input order.
    pub files: Vec<String>,
}

/// Upload handler
///
/// Accepts a multipart request with file parts named `files` (or `file`),
/// validates each part against the image allow-list, spools accepted parts to
/// local disk, forwards them to the cloud provider concurrently, and returns
/// the resulting secure URLs.
///
/// # Errors
/// - `AppError::InvalidInput` - bad extension/MIME, no files, too many parts,
///   or a malformed multipart body (HTTP 400)
/// - `AppError::PayloadTooLarge` - request body over the ceiling (HTTP 400)
/// - `AppError::CloudUpload` - provider failure (HTTP 500)
#[tracing::instrument(skip(state, multipart), fields(operation = "upload_files"))]
pub async fn upload_files(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, HttpAppError> {
    let service = UploadService::new(&state);
    let files = service.upload(multipart).await?;

    Ok(Json(UploadResponse {
        message: "Files uploaded successfully!".to_string(),
        files,
    }))
}
