//! Repositories for store operations
//!
//! Every operation is a single statement, so each call is atomic on its own
//! and nothing spans more than one statement.

use chrono::Utc;
use common::StoreResult;
use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

use crate::models::{NewUser, User};

pub mod feed;
pub mod follow;
pub mod post;

pub use feed::FeedRepository;
pub use follow::FollowRepository;
pub use post::PostRepository;

/// User repository for store operations
#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new user
    ///
    /// Fails with `UniqueConstraintViolation` when the username or the email
    /// is already registered.
    pub async fn create(&self, new_user: &NewUser) -> StoreResult<Uuid> {
        info!("Creating new user: {}", new_user.username);

        let id = Uuid::new_v4();
        sqlx::query(
            r#"
            INSERT INTO users (id, name, surname, email, username, password_hash, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id)
        .bind(&new_user.name)
        .bind(&new_user.surname)
        .bind(&new_user.email)
        .bind(&new_user.username)
        .bind(&new_user.password_hash)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    /// Find a user by username
    pub async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, surname, email, username, password_hash, created_at
            FROM users
            WHERE username = ?
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find a user by ID
    pub async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, surname, email, username, password_hash, created_at
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Get all users
    pub async fn list_all(&self) -> StoreResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, surname, email, username, password_hash, created_at
            FROM users
            ORDER BY username
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }
}
