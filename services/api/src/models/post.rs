//! Post models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Post entity
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Post {
    pub id: Uuid,
    pub date: DateTime<Utc>,
    pub description: String,
    pub user_id: Uuid,
    pub image_path: String,
}

/// New post submission
///
/// The image has already been stored by the upload handler; only its path
/// reaches the store.
#[derive(Debug, Clone, Deserialize)]
pub struct NewPost {
    pub description: String,
    /// Post date, defaults to the submission time
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    pub image_path: String,
}

/// A feed entry: a post joined with its author's username
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PostView {
    pub post_id: Uuid,
    pub date: DateTime<Utc>,
    pub description: String,
    pub author_id: Uuid,
    pub image_path: String,
    pub author_username: String,
}
