//! Application state shared across handlers

use auth::{AuthGate, CredentialService};
use sqlx::SqlitePool;

use crate::repositories::{FeedRepository, FollowRepository, PostRepository, UserRepository};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub user_repository: UserRepository,
    pub post_repository: PostRepository,
    pub follow_repository: FollowRepository,
    pub feed_repository: FeedRepository,
    pub credentials: CredentialService,
    pub auth_gate: AuthGate,
}

impl AppState {
    /// Build the state and its repositories around one pool
    pub fn new(db_pool: SqlitePool, credentials: CredentialService, auth_gate: AuthGate) -> Self {
        Self {
            user_repository: UserRepository::new(db_pool.clone()),
            post_repository: PostRepository::new(db_pool.clone()),
            follow_repository: FollowRepository::new(db_pool.clone()),
            feed_repository: FeedRepository::new(db_pool.clone()),
            db_pool,
            credentials,
            auth_gate,
        }
    }
}
