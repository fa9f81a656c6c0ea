//! Session storage keyed by opaque token
//!
//! Each entry maps a token to the signed-in user and an expiry instant.
//! Expired entries read as absent whether or not they have been purged yet.

use common::cache::RedisPool;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::info;
use uuid::Uuid;

/// Session backend errors
#[derive(Error, Debug)]
pub enum SessionError {
    /// The backing store failed
    #[error("Session backend error: {0}")]
    Backend(String),
}

/// A stored session
#[derive(Debug, Clone, Copy)]
struct SessionEntry {
    user_id: Uuid,
    expires_at: Instant,
}

impl SessionEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// In-process session table
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    entries: Arc<Mutex<HashMap<String, SessionEntry>>>,
}

impl MemorySessionStore {
    /// Create an empty session table
    pub fn new() -> Self {
        Self::default()
    }

    async fn insert(&self, token: &str, user_id: Uuid, ttl: Duration) {
        let mut entries = self.entries.lock().await;
        entries.insert(
            token.to_string(),
            SessionEntry {
                user_id,
                expires_at: Instant::now() + ttl,
            },
        );
    }

    async fn get(&self, token: &str) -> Option<Uuid> {
        let mut entries = self.entries.lock().await;
        let entry = *entries.get(token)?;

        if entry.is_expired(Instant::now()) {
            entries.remove(token);
            return None;
        }

        Some(entry.user_id)
    }

    async fn remove(&self, token: &str) -> bool {
        self.entries.lock().await.remove(token).is_some()
    }

    async fn purge_expired(&self) -> usize {
        let mut entries = self.entries.lock().await;
        let now = Instant::now();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        before - entries.len()
    }

    /// Number of entries currently held, expired or not
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    /// Whether the table holds no entries
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// Redis-backed sessions, expired by Redis itself
#[derive(Clone)]
pub struct RedisSessionStore {
    redis_pool: RedisPool,
}

impl RedisSessionStore {
    /// Create a session store on top of a Redis pool
    pub fn new(redis_pool: RedisPool) -> Self {
        Self { redis_pool }
    }

    fn session_key(token: &str) -> String {
        format!("session:{}", token)
    }

    async fn insert(
        &self,
        token: &str,
        user_id: Uuid,
        ttl: Duration,
    ) -> Result<(), SessionError> {
        // Redis expiry has second granularity
        let ttl_seconds = ttl.as_secs().max(1);
        self.redis_pool
            .set(
                &Self::session_key(token),
                &user_id.to_string(),
                Some(ttl_seconds),
            )
            .await
            .map_err(|e| SessionError::Backend(e.to_string()))
    }

    async fn get(&self, token: &str) -> Result<Option<Uuid>, SessionError> {
        let value = self
            .redis_pool
            .get(&Self::session_key(token))
            .await
            .map_err(|e| SessionError::Backend(e.to_string()))?;

        value
            .map(|raw| {
                Uuid::parse_str(&raw)
                    .map_err(|e| SessionError::Backend(format!("Corrupt session entry: {}", e)))
            })
            .transpose()
    }

    async fn remove(&self, token: &str) -> Result<bool, SessionError> {
        self.redis_pool
            .delete(&Self::session_key(token))
            .await
            .map_err(|e| SessionError::Backend(e.to_string()))
    }
}

/// Session table, in process or in Redis
#[derive(Clone)]
pub enum SessionStore {
    Memory(MemorySessionStore),
    Redis(RedisSessionStore),
}

impl SessionStore {
    /// Bind a token to a user for `ttl`
    pub async fn insert(
        &self,
        token: &str,
        user_id: Uuid,
        ttl: Duration,
    ) -> Result<(), SessionError> {
        match self {
            SessionStore::Memory(store) => {
                store.insert(token, user_id, ttl).await;
                Ok(())
            }
            SessionStore::Redis(store) => store.insert(token, user_id, ttl).await,
        }
    }

    /// Look up the user bound to a live token
    pub async fn get(&self, token: &str) -> Result<Option<Uuid>, SessionError> {
        match self {
            SessionStore::Memory(store) => Ok(store.get(token).await),
            SessionStore::Redis(store) => store.get(token).await,
        }
    }

    /// Drop a token, returning whether it was present
    pub async fn remove(&self, token: &str) -> Result<bool, SessionError> {
        match self {
            SessionStore::Memory(store) => Ok(store.remove(token).await),
            SessionStore::Redis(store) => store.remove(token).await,
        }
    }

    /// Drop every expired entry, returning how many were removed
    pub async fn purge_expired(&self) -> Result<usize, SessionError> {
        match self {
            SessionStore::Memory(store) => {
                let purged = store.purge_expired().await;
                if purged > 0 {
                    info!("Purged {} expired sessions", purged);
                }
                Ok(purged)
            }
            // Redis expires keys on its own
            SessionStore::Redis(_) => Ok(0),
        }
    }
}
