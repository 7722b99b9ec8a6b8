//! Configuration module
//!
//! All settings are read from the process environment once at startup and
//! carried in an immutable struct. Nothing in the application reads the
//! environment after this point.

use std::env;

use anyhow::Context;

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_UPLOAD_DIR: &str = "./uploads";
const DEFAULT_CLOUD_FOLDER: &str = "imgrelay";
const DEFAULT_MAX_UPLOAD_MB: usize = 100;
const DEFAULT_MAX_FILES: usize = 25;

/// Application configuration.
///
/// Built with [`Config::from_env`]; the cloud credential triple is required,
/// everything else has a default.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    /// Cloud account name (first segment of the provider API URL).
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    /// Target folder/namespace on the provider side.
    pub cloud_folder: String,
    /// Local spool directory for accepted uploads.
    pub upload_dir: String,
    /// Total request-body ceiling in bytes.
    pub max_upload_bytes: usize,
    /// Maximum number of file parts per request.
    pub max_files: usize,
    pub allowed_extensions: Vec<String>,
    pub allowed_content_types: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let cloud_name = env::var("CLOUD_NAME").context("Missing CLOUD_NAME")?;
        let api_key = env::var("API_KEY").context("Missing API_KEY")?;
        let api_secret = env::var("API_SECRET").context("Missing API_SECRET")?;

        let config = Config {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| DEFAULT_PORT.to_string())
                .parse()
                .unwrap_or(DEFAULT_PORT),
            cloud_name,
            api_key,
            api_secret,
            cloud_folder: env::var("CLOUD_FOLDER")
                .unwrap_or_else(|_| DEFAULT_CLOUD_FOLDER.to_string()),
            upload_dir: env::var("UPLOAD_DIR").unwrap_or_else(|_| DEFAULT_UPLOAD_DIR.to_string()),
            max_upload_bytes: env::var("MAX_UPLOAD_MB")
                .unwrap_or_else(|_| DEFAULT_MAX_UPLOAD_MB.to_string())
                .parse::<usize>()
                .unwrap_or(DEFAULT_MAX_UPLOAD_MB)
                * 1024
                * 1024,
            max_files: env::var("MAX_FILES")
                .unwrap_or_else(|_| DEFAULT_MAX_FILES.to_string())
                .parse()
                .unwrap_or(DEFAULT_MAX_FILES),
            allowed_extensions: env::var("ALLOWED_EXTENSIONS")
                .unwrap_or_else(|_| "jpeg,jpg,png,webp,gif".to_string())
                .split(',')
                .map(|s| s.trim().to_lowercase())
                .collect(),
            allowed_content_types: env::var("ALLOWED_CONTENT_TYPES")
                .unwrap_or_else(|_| "image/jpeg,image/png,image/webp,image/gif".to_string())
                .split(',')
                .map(|s| s.trim().to_lowercase())
                .collect(),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.cloud_name.is_empty() || self.api_key.is_empty() || self.api_secret.is_empty() {
            anyhow::bail!("CLOUD_NAME, API_KEY, and API_SECRET must be non-empty");
        }
        if self.max_upload_bytes == 0 {
            anyhow::bail!("MAX_UPLOAD_MB must be greater than zero");
        }
        if self.max_files == 0 {
            anyhow::bail!("MAX_FILES must be greater than zero");
        }
        if self.allowed_extensions.is_empty() {
            anyhow::bail!("ALLOWED_EXTENSIONS must not be empty");
        }
        Ok(())
    }
}
