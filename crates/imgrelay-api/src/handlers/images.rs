use std::sync::Arc;

use axum::{extract::State, Json};
use imgrelay_core::AppError;
use serde::Serialize;

use crate::error::HttpAppError;
use crate::state::AppState;

const MAX_LIST_RESULTS: u32 = 100;

#[derive(Debug, Serialize)]
pub struct ImagesResponse {
    /// Secure HTTPS URLs of images hosted under the configured folder.
    pub files: Vec<String>,
}

/// Listing handler
///
/// Searches the provider for images under the configured folder and returns
/// their secure URLs in the response body.
#[tracing::instrument(skip(state), fields(operation = "list_images"))]
pub async fn list_images(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ImagesResponse>, HttpAppError> {
    let images = state
        .host
        .list(&state.cloud_folder, MAX_LIST_RESULTS)
        .await
        .map_err(|e| AppError::Internal(format!("Cloud listing failed: {}", e)))?;

    tracing::info!(
        folder = %state.cloud_folder,
        count = images.len(),
        "Listed hosted images"
    );

    Ok(Json(ImagesResponse {
        files: images.into_iter().map(|i| i.secure_url).collect(),
    }))
}
