//! Feed assembly
//!
//! The feed of a viewer is every post whose author the viewer follows,
//! joined with the author's username. It is built with one join over
//! posts, follows and users filtered on the follower side of the edge.

use common::StoreResult;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::models::PostView;

/// Feed repository
#[derive(Clone)]
pub struct FeedRepository {
    pool: SqlitePool,
}

impl FeedRepository {
    /// Create a new feed repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Posts by the users `viewer_id` follows
    ///
    /// Rows come back newest first, but callers should not treat the order
    /// as part of the contract.
    pub async fn feed_for(&self, viewer_id: Uuid) -> StoreResult<Vec<PostView>> {
        let posts = sqlx::query_as::<_, PostView>(
            r#"
            SELECT p.id AS post_id,
                   p.created_at AS date,
                   p.description,
                   p.user_id AS author_id,
                   p.image_path,
                   u.username AS author_username
            FROM posts p
            INNER JOIN follows f ON p.user_id = f.followed_id
            INNER JOIN users u ON p.user_id = u.id
            WHERE f.follower_id = ?
            ORDER BY p.created_at DESC
            "#,
        )
        .bind(viewer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(posts)
    }
}
