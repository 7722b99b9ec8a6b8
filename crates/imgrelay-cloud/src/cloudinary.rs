//! Cloudinary-protocol client
//!
//! Signed multipart uploads against `/v1_1/{cloud_name}/image/upload` and
//! admin-API listings with basic auth. Signatures are SHA-256 over the sorted
//! signed parameters concatenated with the API secret.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::{CloudError, CloudResult, HostedImage, ImageHost, UploadRequest};

const DEFAULT_API_BASE: &str = "https://api.cloudinary.com/v1_1";
const REQUEST_TIMEOUT_SECS: u64 = 60;

/// HTTP client for the Cloudinary upload and admin APIs.
#[derive(Clone, Debug)]
pub struct CloudinaryClient {
    client: Client,
    api_base: String,
    cloud_name: String,
    api_key: String,
    api_secret: String,
}

#[derive(Debug, Deserialize)]
struct ResourceListResponse {
    #[serde(default)]
    resources: Vec<HostedImage>,
}

impl CloudinaryClient {
    pub fn new(
        cloud_name: String,
        api_key: String,
        api_secret: String,
    ) -> Result<Self, CloudError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            api_base: DEFAULT_API_BASE.to_string(),
            cloud_name,
            api_key,
            api_secret,
        })
    }

    /// Override the API base URL (upload prefix), e.g. for a regional proxy.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    fn upload_url(&self) -> String {
        format!("{}/{}/image/upload", self.api_base, self.cloud_name)
    }

    fn list_url(&self) -> String {
        format!("{}/{}/resources/image/upload", self.api_base, self.cloud_name)
    }

    /// The canonical string the signature is computed over: signed parameters
    /// sorted by key, empty values excluded, joined as `k=v` with `&`.
    fn string_to_sign(params: &BTreeMap<&str, String>) -> String {
        params
            .iter()
            .filter(|(_, v)| !v.is_empty())
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&")
    }

    fn sign(&self, params: &BTreeMap<&str, String>) -> String {
        let mut hasher = Sha256::new();
        hasher.update(Self::string_to_sign(params).as_bytes());
        hasher.update(self.api_secret.as_bytes());
        hex::encode(hasher.finalize())
    }

    fn unix_timestamp() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }

    /// Pull the provider's error message out of its JSON error body, falling
    /// back to the raw text.
    fn provider_error_detail(status: reqwest::StatusCode, body: &str) -> String {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| {
                v.get("error")
                    .and_then(|e| e.get("message"))
                    .and_then(|m| m.as_str())
                    .map(|m| m.to_string())
            })
            .unwrap_or_else(|| body.to_string());
        format!("status {}: {}", status, message)
    }
}

#[async_trait]
impl ImageHost for CloudinaryClient {
    async fn upload(&self, path: &Path, request: &UploadRequest) -> CloudResult<HostedImage> {
        let data = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload")
            .to_string();

        let timestamp = Self::unix_timestamp().to_string();
        let mut signed_params: BTreeMap<&str, String> = BTreeMap::new();
        signed_params.insert("folder", request.folder.clone());
        signed_params.insert("public_id", request.public_id.clone());
        signed_params.insert("timestamp", timestamp.clone());
        let signature = self.sign(&signed_params);

        let part = reqwest::multipart::Part::bytes(data).file_name(file_name);
        let mut form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("api_key", self.api_key.clone())
            .text("timestamp", timestamp)
            .text("signature", signature);
        for (key, value) in signed_params {
            if !value.is_empty() && key != "timestamp" {
                form = form.text(key, value);
            }
        }

        let response = self
            .client
            .post(self.upload_url())
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CloudError::UploadFailed(Self::provider_error_detail(
                status, &body,
            )));
        }

        let image: HostedImage = response
            .json()
            .await
            .map_err(|e| CloudError::UploadFailed(format!("Invalid provider response: {}", e)))?;

        tracing::debug!(
            public_id = %image.public_id,
            secure_url = %image.secure_url,
            "Cloud upload successful"
        );

        Ok(image)
    }

    async fn list(&self, folder: &str, max_results: u32) -> CloudResult<Vec<HostedImage>> {
        let response = self
            .client
            .get(self.list_url())
            .basic_auth(&self.api_key, Some(&self.api_secret))
            .query(&[
                ("prefix", folder.to_string()),
                ("max_results", max_results.to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CloudError::ListFailed(Self::provider_error_detail(
                status, &body,
            )));
        }

        let listing: ResourceListResponse = response
            .json()
            .await
            .map_err(|e| CloudError::ListFailed(format!("Invalid provider response: {}", e)))?;

        Ok(listing.resources)
    }
}
