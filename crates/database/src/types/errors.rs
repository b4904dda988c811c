//! Error types for the database layer

use thiserror::Error;

/// Failures while bringing the database up
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Database connection error: {0}")]
    ConnectionError(String),

    #[error("Database migration error: {0}")]
    MigrationError(String),
}

/// Failures reported by the repositories
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("User not found")]
    UserNotFound,

    #[error("Email already exists")]
    EmailAlreadyExists,

    #[error("Database error: {0}")]
    Query(#[from] sqlx::Error),
}

impl StoreError {
    /// Translate a failed insert, turning a unique violation on `users.email`
    /// into [`StoreError::EmailAlreadyExists`].
    pub(crate) fn from_insert(error: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &error {
            if db_err.is_unique_violation() && db_err.message().contains("users.email") {
                return StoreError::EmailAlreadyExists;
            }
        }
        StoreError::Query(error)
    }
}
