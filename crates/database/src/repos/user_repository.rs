//! User repository for database operations.

use chrono::Utc;
use cuid2::CuidConstructor;
use once_cell::sync::Lazy;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::entities::{Gender, NewUser, ProfileChanges, User, UserRelations};
use crate::types::{StoreError, StoreResult};

static CUID: Lazy<CuidConstructor> = Lazy::new(CuidConstructor::new);

const USER_COLUMNS: &str = "id, public_id, username, email, password_hash, bio, gender, profile_picture, created_at, updated_at";

/// Repository for user database operations
#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Find user by internal ID
    pub async fn find_by_id(&self, id: i64) -> StoreResult<Option<User>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(user_from_row).transpose().map_err(Into::into)
    }

    /// Find user by public ID
    pub async fn find_by_public_id(&self, public_id: &str) -> StoreResult<Option<User>> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE public_id = ?"
        ))
        .bind(public_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(user_from_row).transpose().map_err(Into::into)
    }

    /// Find user by email
    pub async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(user_from_row).transpose().map_err(Into::into)
    }

    /// Insert a user. A taken email surfaces as [`StoreError::EmailAlreadyExists`]
    /// straight from the unique index, so concurrent inserts have one winner.
    pub async fn create(&self, new_user: &NewUser) -> StoreResult<User> {
        let now = Utc::now().to_rfc3339();
        let public_id = CUID.create_id();

        let result = sqlx::query(
            "INSERT INTO users (public_id, username, email, password_hash, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&public_id)
        .bind(&new_user.username)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(StoreError::from_insert)?;

        let user_id = result.last_insert_rowid();

        self.find_by_id(user_id)
            .await?
            .ok_or(StoreError::UserNotFound)
    }

    /// Overwrite the supplied profile columns and return the fresh row
    pub async fn update_profile(&self, user_id: i64, changes: &ProfileChanges) -> StoreResult<User> {
        if changes.is_empty() {
            return self
                .find_by_id(user_id)
                .await?
                .ok_or(StoreError::UserNotFound);
        }

        let mut set_parts = Vec::new();
        let mut values: Vec<String> = Vec::new();

        if let Some(bio) = &changes.bio {
            set_parts.push("bio = ?");
            values.push(bio.clone());
        }

        if let Some(gender) = changes.gender {
            set_parts.push("gender = ?");
            values.push(gender.as_str().to_string());
        }

        if let Some(picture) = &changes.profile_picture {
            set_parts.push("profile_picture = ?");
            values.push(picture.clone());
        }

        set_parts.push("updated_at = ?");
        values.push(Utc::now().to_rfc3339());

        let statement = format!("UPDATE users SET {} WHERE id = ?", set_parts.join(", "));

        let mut query = sqlx::query(&statement);
        for value in values {
            query = query.bind(value);
        }

        let result = query.bind(user_id).execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::UserNotFound);
        }

        self.find_by_id(user_id)
            .await?
            .ok_or(StoreError::UserNotFound)
    }

    /// Up to `limit` users other than `exclude_id`, oldest account first
    pub async fn list_excluding(&self, exclude_id: i64, limit: u32) -> StoreResult<Vec<User>> {
        let rows = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id != ? ORDER BY id ASC LIMIT ?"
        ))
        .bind(exclude_id)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(user_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(Into::into)
    }

    /// Followers, followees and posts of a user as public ids, in insertion order
    pub async fn relations(&self, user_id: i64) -> StoreResult<UserRelations> {
        let followers: Vec<String> = sqlx::query_scalar(
            "SELECT u.public_id FROM follows f JOIN users u ON u.id = f.follower_id WHERE f.followee_id = ? ORDER BY f.rowid",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let following: Vec<String> = sqlx::query_scalar(
            "SELECT u.public_id FROM follows f JOIN users u ON u.id = f.followee_id WHERE f.follower_id = ? ORDER BY f.rowid",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let posts: Vec<String> =
            sqlx::query_scalar("SELECT public_id FROM posts WHERE author_id = ? ORDER BY id")
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?;

        Ok(UserRelations {
            followers,
            following,
            posts,
        })
    }

    pub async fn count(&self) -> StoreResult<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

fn user_from_row(row: &SqliteRow) -> Result<User, sqlx::Error> {
    let gender: Option<String> = row.try_get("gender")?;
    let gender = gender
        .map(|value| value.parse::<Gender>())
        .transpose()
        .map_err(|message| sqlx::Error::ColumnDecode {
            index: "gender".to_string(),
            source: message.into(),
        })?;

    Ok(User {
        id: row.try_get("id")?,
        public_id: row.try_get("public_id")?,
        username: row.try_get("username")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        bio: row.try_get("bio")?,
        gender,
        profile_picture: row.try_get("profile_picture")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
