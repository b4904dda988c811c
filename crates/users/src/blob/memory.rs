use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::RwLock;

use super::{BlobStore, BlobStoreError};
use crate::types::ImageUpload;

/// In-process store for tests and local runs. Contents vanish with the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryBlobStore {
    objects: Arc<RwLock<HashMap<String, Bytes>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, uri: &str) -> Option<Bytes> {
        self.objects.read().await.get(uri).cloned()
    }

    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn upload(&self, image: ImageUpload) -> Result<String, BlobStoreError> {
        let uri = format!("memory://{}", uuid::Uuid::new_v4());
        self.objects.write().await.insert(uri.clone(), image.bytes);
        Ok(uri)
    }
}
