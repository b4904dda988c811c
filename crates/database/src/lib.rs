//! Circle Database Crate
//!
//! Connection management, migrations, and the repositories backing user
//! accounts and the follow graph.

use tracing::error;

use circle_config::DatabaseConfig;

pub mod connection;
pub mod entities;
pub mod migrations;
pub mod repos;
pub mod types;

pub use connection::prepare_database;
pub use migrations::run_migrations;

pub use repos::{FollowRepository, UserRepository};

pub use entities::{FollowAction, Gender, NewUser, ProfileChanges, User, UserRelations};

pub use types::{DatabaseError, DatabaseResult, StoreError, StoreResult};

pub use sqlx::SqlitePool;

/// Connect and bring the schema up to date
pub async fn initialize_database(config: &DatabaseConfig) -> DatabaseResult<SqlitePool> {
    let pool = prepare_database(config).await.map_err(|e| {
        error!(error = %e, "failed to open database");
        DatabaseError::ConnectionError(format!("{e:#}"))
    })?;

    run_migrations(&pool).await.map_err(|e| {
        error!(error = %e, "failed to migrate database");
        DatabaseError::MigrationError(format!("{e:#}"))
    })?;

    Ok(pool)
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use tempfile::TempDir;

    /// Fresh migrated database in a temp dir. Keep the dir alive for the test.
    pub async fn test_pool() -> (SqlitePool, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config = DatabaseConfig {
            url: format!("sqlite://{}", temp_dir.path().join("test.db").display()),
            max_connections: 4,
        };

        let pool = initialize_database(&config).await.unwrap();
        (pool, temp_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn initialize_database_reports_unreachable_path_as_connection_error() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let blocker = temp_dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"file").unwrap();

        let config = DatabaseConfig {
            url: format!("sqlite://{}", blocker.join("test.db").display()),
            max_connections: 1,
        };

        let result = initialize_database(&config).await;
        assert!(matches!(result, Err(DatabaseError::ConnectionError(_))));
    }

    #[tokio::test]
    async fn initialize_database_on_memory_url_is_usable() {
        let config = DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
        };

        let pool = initialize_database(&config).await.unwrap();
        let users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(users, 0);
    }
}
