//! Follow-edge repository
//!
//! An edge `(follower, followed)` means the follower receives the followed
//! user's posts in their feed. Both directions of the API are idempotent:
//! following twice keeps one edge, unfollowing a missing edge is a no-op.

use chrono::Utc;
use common::{StoreError, StoreResult};
use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

/// Follow repository for store operations
#[derive(Clone)]
pub struct FollowRepository {
    pool: SqlitePool,
}

impl FollowRepository {
    /// Create a new follow repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Make `follower_id` follow `followed_id`
    ///
    /// Returns whether a new edge was created. Self-follows are rejected and
    /// unknown users fail with `ForeignKeyViolation`.
    pub async fn follow(&self, follower_id: Uuid, followed_id: Uuid) -> StoreResult<bool> {
        if follower_id == followed_id {
            return Err(StoreError::SelfFollow);
        }

        let result = sqlx::query(
            r#"
            INSERT INTO follows (follower_id, followed_id, created_at)
            VALUES (?, ?, ?)
            ON CONFLICT (follower_id, followed_id) DO NOTHING
            "#,
        )
        .bind(follower_id)
        .bind(followed_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        let created = result.rows_affected() > 0;
        if created {
            info!("User {} now follows {}", follower_id, followed_id);
        }

        Ok(created)
    }

    /// Remove the edge, returning whether one existed
    pub async fn unfollow(&self, follower_id: Uuid, followed_id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM follows
            WHERE follower_id = ? AND followed_id = ?
            "#,
        )
        .bind(follower_id)
        .bind(followed_id)
        .execute(&self.pool)
        .await?;

        let removed = result.rows_affected() > 0;
        if removed {
            info!("User {} unfollowed {}", follower_id, followed_id);
        }

        Ok(removed)
    }

    /// IDs of the users `follower_id` follows
    pub async fn list_followed(&self, follower_id: Uuid) -> StoreResult<Vec<Uuid>> {
        let followed = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT followed_id
            FROM follows
            WHERE follower_id = ?
            "#,
        )
        .bind(follower_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(followed)
    }
}
