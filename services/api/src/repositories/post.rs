//! Post repository for store operations

use chrono::Utc;
use common::StoreResult;
use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

use crate::models::{NewPost, Post};

/// Post repository for store operations
#[derive(Clone)]
pub struct PostRepository {
    pool: SqlitePool,
}

impl PostRepository {
    /// Create a new post repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a post owned by `author_id`
    ///
    /// Fails with `ForeignKeyViolation` when the author does not exist.
    pub async fn create(&self, new_post: &NewPost, author_id: Uuid) -> StoreResult<Uuid> {
        info!("Creating post for user: {}", author_id);

        let id = Uuid::new_v4();
        sqlx::query(
            r#"
            INSERT INTO posts (id, created_at, description, user_id, image_path)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(id)
        .bind(new_post.date.unwrap_or_else(Utc::now))
        .bind(&new_post.description)
        .bind(author_id)
        .bind(&new_post.image_path)
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    /// Find a post by ID
    pub async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Post>> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            SELECT id, created_at AS date, description, user_id, image_path
            FROM posts
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(post)
    }
}
