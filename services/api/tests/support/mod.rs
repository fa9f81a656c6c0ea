//! Shared fixtures for the API integration tests

#![allow(dead_code)]

use api::{AppState, models::NewUser};
use auth::{AuthGate, Cost, CredentialService, MemorySessionStore, SessionStore};
use common::database::{DatabaseConfig, init_pool, run_migrations};
use sqlx::SqlitePool;
use std::time::Duration;
use uuid::Uuid;

/// Cheap hashing parameters so tests stay fast
pub const TEST_COST: Cost = Cost {
    iterations: 1,
    memory_kib: 256,
};

/// A migrated private in-memory database
pub async fn test_pool() -> SqlitePool {
    let pool = init_pool(&DatabaseConfig::in_memory())
        .await
        .expect("Failed to open in-memory database");
    run_migrations(&pool).await.expect("Failed to migrate");
    pool
}

/// Application state over a fresh database with the given session TTL
pub async fn test_state(ttl: Duration) -> AppState {
    let pool = test_pool().await;
    let credentials = CredentialService::new(TEST_COST).expect("Failed to build credentials");
    let auth_gate = AuthGate::new(SessionStore::Memory(MemorySessionStore::new()), ttl);
    AppState::new(pool, credentials, auth_gate)
}

/// Profile for a user named after `username`
pub fn profile(username: &str) -> NewUser {
    NewUser {
        name: format!("{} name", username),
        surname: format!("{} surname", username),
        email: format!("{}@example.com", username),
        username: username.to_string(),
        password_hash: "$argon2id$v=19$m=256,t=1,p=1$c2FsdHNhbHRzYWx0$aGFzaGhhc2hoYXNo".to_string(),
    }
}

/// Insert a user straight through the repository
pub async fn create_user(state: &AppState, username: &str) -> Uuid {
    state
        .user_repository
        .create(&profile(username))
        .await
        .expect("Failed to create user")
}
