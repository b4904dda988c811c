//! Request types for the user services.

use bytes::Bytes;
use serde::Deserialize;

/// Registration payload. Absent fields deserialize as empty and fail validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Raw image bytes received from a client
#[derive(Debug, Clone, PartialEq)]
pub struct ImageUpload {
    pub bytes: Bytes,
    pub content_type: String,
    pub file_name: Option<String>,
}

impl ImageUpload {
    pub fn new(bytes: impl Into<Bytes>, content_type: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            content_type: content_type.into(),
            file_name: None,
        }
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }
}

/// Profile edit as submitted. Empty text values are treated as absent.
#[derive(Debug, Clone, Default)]
pub struct ProfileEdit {
    pub bio: Option<String>,
    pub gender: Option<String>,
    pub image: Option<ImageUpload>,
}
