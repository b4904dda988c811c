//! Follow edge repository

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::entities::FollowAction;
use crate::types::StoreResult;

/// Repository for the `follows` edge table
#[derive(Clone)]
pub struct FollowRepository {
    pool: SqlitePool,
}

impl FollowRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Flip the edge `follower -> followee` inside one transaction.
    ///
    /// The delete runs first and takes the write lock, so two concurrent
    /// toggles by the same pair serialise and always land on opposite
    /// outcomes. Callers reject `follower_id == followee_id` beforehand; the
    /// table's CHECK constraint backs that up.
    pub async fn toggle(&self, follower_id: i64, followee_id: i64) -> StoreResult<FollowAction> {
        let mut tx = self.pool.begin().await?;

        let removed = sqlx::query("DELETE FROM follows WHERE follower_id = ? AND followee_id = ?")
            .bind(follower_id)
            .bind(followee_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let action = if removed > 0 {
            FollowAction::Unfollowed
        } else {
            sqlx::query("INSERT INTO follows (follower_id, followee_id, created_at) VALUES (?, ?, ?)")
                .bind(follower_id)
                .bind(followee_id)
                .bind(Utc::now().to_rfc3339())
                .execute(&mut *tx)
                .await?;
            FollowAction::Followed
        };

        tx.commit().await?;

        debug!(follower_id, followee_id, %action, "follow edge toggled");
        Ok(action)
    }

    pub async fn is_following(&self, follower_id: i64, followee_id: i64) -> StoreResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM follows WHERE follower_id = ? AND followee_id = ?)",
        )
        .bind(follower_id)
        .bind(followee_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    pub async fn count(&self) -> StoreResult<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM follows")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
