//! Local spool directory
//!
//! Accepted multipart parts are written here under a collision-resistant
//! generated name before being forwarded to the cloud provider, and removed
//! again once the forward succeeds.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

/// Spool operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Invalid spool name: {0}")]
    InvalidName(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for spool operations
pub type StorageResult<T> = Result<T, StorageError>;

/// One accepted multipart part, persisted to the spool directory.
///
/// Created when ingress accepts a part; the on-disk file is removed after the
/// cloud upload for that part completes.
#[derive(Debug, Clone)]
pub struct SpooledFile {
    /// Multipart field name the part arrived under.
    pub field_name: String,
    /// Filename as declared by the client.
    pub original_filename: String,
    /// Content type as declared by the client.
    pub content_type: String,
    /// Byte size of the part body.
    pub size: usize,
    /// Generated name the part was stored under (`{uuid}.{ext}`).
    pub stored_name: String,
    /// Absolute-or-relative path of the spooled file on disk.
    pub path: PathBuf,
}

/// Local spool directory for transient upload storage.
#[derive(Clone)]
pub struct SpoolDir {
    base_path: PathBuf,
}

impl SpoolDir {
    /// Create a new SpoolDir, creating the directory tree if needed.
    pub async fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create spool directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(SpoolDir { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Convert a stored name to a filesystem path, rejecting anything that
    /// could escape the spool directory.
    fn name_to_path(&self, stored_name: &str) -> StorageResult<PathBuf> {
        if stored_name.contains("..")
            || stored_name.contains('/')
            || stored_name.contains('\\')
        {
            return Err(StorageError::InvalidName(
                "Spool name contains invalid characters".to_string(),
            ));
        }
        Ok(self.base_path.join(stored_name))
    }

    /// Persist one part under a fresh `{uuid}.{ext}` name.
    ///
    /// The extension must already be validated/normalized by the caller;
    /// generated names never collide across requests.
    pub async fn store(
        &self,
        field_name: &str,
        original_filename: &str,
        content_type: &str,
        extension: &str,
        data: Vec<u8>,
    ) -> StorageResult<SpooledFile> {
        let stored_name = format!("{}.{}", Uuid::new_v4(), extension);
        let path = self.name_to_path(&stored_name)?;
        let size = data.len();

        let mut file = fs::File::create(&path).await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        file.write_all(&data).await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        tracing::debug!(
            path = %path.display(),
            original_filename = %original_filename,
            size_bytes = size,
            "Spooled upload to local storage"
        );

        Ok(SpooledFile {
            field_name: field_name.to_string(),
            original_filename: original_filename.to_string(),
            content_type: content_type.to_string(),
            size,
            stored_name,
            path,
        })
    }

    /// Remove a spooled file. Removing a file that is already gone is not an
    /// error.
    pub async fn remove(&self, file: &SpooledFile) -> StorageResult<()> {
        let path = self.name_to_path(&file.stored_name)?;

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Ok(());
        }

        fs::remove_file(&path).await.map_err(|e| {
            StorageError::DeleteFailed(format!("Failed to delete file {}: {}", path.display(), e))
        })?;

        tracing::debug!(path = %path.display(), "Removed spooled file");

        Ok(())
    }
}
