//! Error types for account, profile and follow operations.

use circle_database::StoreError;
use thiserror::Error;

/// Failures surfaced by the user services
#[derive(Debug, Error)]
pub enum UserError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    /// Unknown email and wrong password are reported identically.
    #[error("Invalid credentials")]
    Authentication,

    #[error("{0}")]
    NotFound(String),

    #[error("You can't follow yourself")]
    SelfAction,

    #[error("Image upload failed: {0}")]
    BlobStore(String),

    #[error("Image uploads are not configured")]
    BlobStoreUnavailable,

    #[error("Token creation failed: {0}")]
    TokenCreationFailed(String),

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Persistence error: {0}")]
    Persistence(String),
}

impl UserError {
    pub fn validation(message: impl Into<String>) -> Self {
        UserError::Validation(message.into())
    }

    pub fn user_not_found() -> Self {
        UserError::NotFound("User not found".to_string())
    }
}

impl From<StoreError> for UserError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UserNotFound => UserError::user_not_found(),
            StoreError::EmailAlreadyExists => UserError::Conflict("Email already exists".to_string()),
            StoreError::Query(err) => UserError::Persistence(err.to_string()),
        }
    }
}

impl From<sqlx::Error> for UserError {
    fn from(err: sqlx::Error) -> Self {
        UserError::Persistence(err.to_string())
    }
}
