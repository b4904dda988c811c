//! Unsigned uploads to Cloudinary.

use std::time::Duration;

use async_trait::async_trait;
use circle_config::CloudinaryConfig;
use reqwest::multipart::Form;
use serde::Deserialize;
use tracing::{debug, warn};

use super::{data_uri, BlobStore, BlobStoreError};
use crate::types::ImageUpload;

#[derive(Debug, Clone)]
pub struct CloudinaryBlobStore {
    http: reqwest::Client,
    upload_url: String,
    upload_preset: String,
    folder: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

impl CloudinaryBlobStore {
    pub fn from_config(config: &CloudinaryConfig) -> Result<Self, BlobStoreError> {
        let cloud_name = non_empty(config.cloud_name.as_deref()).ok_or_else(|| {
            BlobStoreError::Misconfigured("blob_store.cloudinary.cloud_name is required".into())
        })?;
        let upload_preset = non_empty(config.upload_preset.as_deref()).ok_or_else(|| {
            BlobStoreError::Misconfigured("blob_store.cloudinary.upload_preset is required".into())
        })?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|err| BlobStoreError::Misconfigured(err.to_string()))?;

        Ok(Self {
            http,
            upload_url: upload_url(&config.base_url, cloud_name),
            upload_preset: upload_preset.to_string(),
            folder: non_empty(config.folder.as_deref()).map(str::to_string),
        })
    }

    pub fn upload_url(&self) -> &str {
        &self.upload_url
    }
}

#[async_trait]
impl BlobStore for CloudinaryBlobStore {
    async fn upload(&self, image: ImageUpload) -> Result<String, BlobStoreError> {
        let mut form = Form::new()
            .text("file", data_uri(&image))
            .text("upload_preset", self.upload_preset.clone());
        if let Some(folder) = &self.folder {
            form = form.text("folder", folder.clone());
        }

        let response = self
            .http
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await
            .map_err(|err| BlobStoreError::Request(err.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| BlobStoreError::Request(err.to_string()))?;

        if !status.is_success() {
            let message = rejection_message(&body);
            warn!(status = status.as_u16(), %message, "cloudinary rejected upload");
            return Err(BlobStoreError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let secure_url = parse_secure_url(&body)?;
        debug!(%secure_url, bytes = image.bytes.len(), "image uploaded to cloudinary");
        Ok(secure_url)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

fn upload_url(base_url: &str, cloud_name: &str) -> String {
    format!("{}/{}/image/upload", base_url.trim_end_matches('/'), cloud_name)
}

fn parse_secure_url(body: &str) -> Result<String, BlobStoreError> {
    serde_json::from_str::<UploadResponse>(body)
        .map(|response| response.secure_url)
        .map_err(|err| BlobStoreError::InvalidResponse(err.to_string()))
}

fn rejection_message(body: &str) -> String {
    serde_json::from_str::<ErrorResponse>(body)
        .map(|response| response.error.message)
        .unwrap_or_else(|_| body.chars().take(200).collect())
}
