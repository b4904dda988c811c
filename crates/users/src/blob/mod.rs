//! Image storage behind a small trait so services never see the provider.

pub mod cloudinary;
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use circle_config::{BlobStoreConfig, BlobStoreProvider};
use thiserror::Error;

use crate::types::{ImageUpload, UserError};

pub use cloudinary::CloudinaryBlobStore;
pub use memory::MemoryBlobStore;

#[derive(Debug, Error)]
pub enum BlobStoreError {
    #[error("blob store is misconfigured: {0}")]
    Misconfigured(String),

    #[error("upload request failed: {0}")]
    Request(String),

    #[error("upload rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("unexpected upload response: {0}")]
    InvalidResponse(String),
}

impl From<BlobStoreError> for UserError {
    fn from(err: BlobStoreError) -> Self {
        UserError::BlobStore(err.to_string())
    }
}

/// Stores an image and returns the URI clients should load it from
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn upload(&self, image: ImageUpload) -> Result<String, BlobStoreError>;
}

/// Encode an upload as a `data:` URI, the form accepted by hosted image stores
pub fn data_uri(image: &ImageUpload) -> String {
    format!(
        "data:{};base64,{}",
        image.content_type,
        STANDARD.encode(&image.bytes)
    )
}

/// Build the configured store. `Ok(None)` means image uploads are disabled.
pub fn from_config(config: &BlobStoreConfig) -> Result<Option<Arc<dyn BlobStore>>, BlobStoreError> {
    match config.provider {
        BlobStoreProvider::None => Ok(None),
        BlobStoreProvider::Memory => Ok(Some(Arc::new(MemoryBlobStore::new()))),
        BlobStoreProvider::Cloudinary => {
            let store = CloudinaryBlobStore::from_config(&config.cloudinary)?;
            Ok(Some(Arc::new(store)))
        }
    }
}
