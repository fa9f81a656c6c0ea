//! API models for users and request/response payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub mod post;

pub use post::{NewPost, Post, PostView};

/// User entity
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub surname: String,
    pub email: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// New user insertion payload; the password is already hashed
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub surname: String,
    pub email: String,
    pub username: String,
    pub password_hash: String,
}

/// Request for user registration
#[derive(Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub surname: String,
    pub email: String,
    pub username: String,
    pub password: String,
    pub repeat_password: String,
}

/// Response for user registration
#[derive(Serialize)]
pub struct RegisterResponse {
    pub id: Uuid,
    pub username: String,
}

/// Request for user login
#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Response for user login
#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    pub expires_in: u64,
}

/// A user in the directory, flagged when the viewer follows them
#[derive(Serialize)]
pub struct DirectoryEntry {
    #[serde(flatten)]
    pub user: User,
    pub followed: bool,
}

/// Home view: the viewer and their feed
#[derive(Serialize)]
pub struct HomeResponse {
    pub user: User,
    pub posts: Vec<PostView>,
}
