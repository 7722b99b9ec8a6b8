//! Upload orchestration
//!
//! Linear pipeline per request: extract parts → validate → spool-to-disk →
//! fan out one cloud upload per file → delete each spooled copy on its
//! upload's success → collect secure URLs in input order.

use std::path::Path;
use std::sync::Arc;

use axum::extract::Multipart;
use futures::future;
use imgrelay_cloud::UploadRequest;
use imgrelay_core::AppError;
use imgrelay_storage::SpooledFile;

use crate::state::AppState;

/// Multipart field names that carry file parts. Other fields are ignored.
const FILE_FIELD_NAMES: [&str; 2] = ["files", "file"];

/// One extracted multipart file part, not yet validated or persisted.
struct ExtractedPart {
    field_name: String,
    filename: String,
    content_type: String,
    data: Vec<u8>,
}

pub struct UploadService {
    state: Arc<AppState>,
}

impl UploadService {
    pub fn new(state: &Arc<AppState>) -> Self {
        Self {
            state: state.clone(),
        }
    }

    /// Run the full upload pipeline and return the secure URLs, one per input
    /// file, in input order.
    pub async fn upload(&self, multipart: Multipart) -> Result<Vec<String>, AppError> {
        let parts = self.extract_parts(multipart).await?;

        if parts.is_empty() {
            return Err(AppError::InvalidInput("No files selected!".to_string()));
        }

        // Validate every part before anything touches disk; one bad part
        // rejects the whole request and no cloud call is made.
        let mut extensions = Vec::with_capacity(parts.len());
        for part in &parts {
            let extension = self
                .state
                .validator
                .validate(&part.filename, &part.content_type)?;
            extensions.push(extension);
        }

        let spooled = self.spool_parts(parts, &extensions).await?;
        self.upload_spooled(spooled).await
    }

    /// Read all file parts out of the multipart body. The body-size ceiling
    /// is enforced by the router layer and surfaces here as a read error.
    async fn extract_parts(&self, mut multipart: Multipart) -> Result<Vec<ExtractedPart>, AppError> {
        let mut parts = Vec::new();

        while let Some(field) = multipart.next_field().await.map_err(map_multipart_error)? {
            let field_name = field.name().map(|s| s.to_string()).unwrap_or_default();
            if !FILE_FIELD_NAMES.contains(&field_name.as_str()) {
                continue;
            }

            if parts.len() >= self.state.max_files {
                return Err(AppError::InvalidInput(format!(
                    "Too many files; at most {} per request",
                    self.state.max_files
                )));
            }

            let filename = field
                .file_name()
                .map(|s| s.to_string())
                .unwrap_or_else(|| "unknown".to_string());
            let content_type = field
                .content_type()
                .map(|s| s.to_string())
                .unwrap_or_else(|| "application/octet-stream".to_string());

            let data = field.bytes().await.map_err(map_multipart_error)?;

            parts.push(ExtractedPart {
                field_name,
                filename,
                content_type,
                data: data.to_vec(),
            });
        }

        Ok(parts)
    }

    /// Persist every validated part to the spool directory. If any write
    /// fails, already-spooled siblings are removed before the error is
    /// returned.
    async fn spool_parts(
        &self,
        parts: Vec<ExtractedPart>,
        extensions: &[String],
    ) -> Result<Vec<SpooledFile>, AppError> {
        let mut spooled = Vec::with_capacity(parts.len());

        for (part, extension) in parts.into_iter().zip(extensions) {
            match self
                .state
                .spool
                .store(
                    &part.field_name,
                    &part.filename,
                    &part.content_type,
                    extension,
                    part.data,
                )
                .await
            {
                Ok(file) => spooled.push(file),
                Err(e) => {
                    for file in &spooled {
                        if let Err(cleanup_err) = self.state.spool.remove(file).await {
                            tracing::warn!(
                                error = %cleanup_err,
                                path = %file.path.display(),
                                "Failed to remove spooled file after spool error"
                            );
                        }
                    }
                    return Err(AppError::Internal(format!("Spool error: {}", e)));
                }
            }
        }

        Ok(spooled)
    }

    /// Fan out one cloud upload per spooled file and join them. Each file's
    /// local copy is deleted as soon as its own upload succeeds; the copy
    /// belonging to a failed upload stays on disk. Any failure fails the
    /// whole batch, and uploads that already completed are not rolled back.
    ///
    /// Siblings are never cancelled: every upload runs to completion so each
    /// success can clean up its own spool copy even when another part fails.
    async fn upload_spooled(&self, spooled: Vec<SpooledFile>) -> Result<Vec<String>, AppError> {
        let results = future::join_all(spooled.iter().map(|file| self.upload_one(file))).await;

        let mut urls = Vec::with_capacity(results.len());
        for result in results {
            urls.push(result?);
        }

        tracing::info!(count = urls.len(), "All uploads forwarded to cloud");

        Ok(urls)
    }

    async fn upload_one(&self, file: &SpooledFile) -> Result<String, AppError> {
        let request = UploadRequest {
            folder: self.state.cloud_folder.clone(),
            public_id: public_id_for(&file.stored_name),
        };

        let hosted = self
            .state
            .host
            .upload(&file.path, &request)
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    original_filename = %file.original_filename,
                    "Cloud upload failed"
                );
                AppError::CloudUpload(format!("{}: {}", file.original_filename, e))
            })?;

        if let Err(e) = self.state.spool.remove(file).await {
            tracing::warn!(
                error = %e,
                path = %file.path.display(),
                "Failed to remove spooled file after successful upload"
            );
        }

        tracing::debug!(
            original_filename = %file.original_filename,
            secure_url = %hosted.secure_url,
            "File uploaded and spool copy removed"
        );

        Ok(hosted.secure_url)
    }
}

/// Public ID for the hosted asset: the generated spool name without its
/// extension, so repeated uploads of the same source file stay distinct.
fn public_id_for(stored_name: &str) -> String {
    Path::new(stored_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(stored_name)
        .to_string()
}

fn map_multipart_error(err: axum::extract::multipart::MultipartError) -> AppError {
    if err.status() == axum::http::StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("File size limit exceeded".to_string())
    } else {
        AppError::InvalidInput(format!("Failed to read multipart: {}", err.body_text()))
    }
}
