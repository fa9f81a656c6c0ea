//! Auth gate: maps session tokens to signed-in users
//!
//! A caller is either `Anonymous` or `Authenticated(user_id)`. Logging in
//! moves a caller to `Authenticated`; logging out or letting the session
//! outlive its TTL moves it back to `Anonymous`.

use rand::{Rng, distributions::Alphanumeric};
use std::fmt;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{error, info};
use uuid::Uuid;

use crate::session::{SessionError, SessionStore};

/// Length of an issued session token
pub const TOKEN_LEN: usize = 48;

/// Authentication state of a caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Anonymous,
    Authenticated(Uuid),
}

impl AuthState {
    /// The signed-in user, if any
    pub fn user_id(&self) -> Option<Uuid> {
        match self {
            AuthState::Anonymous => None,
            AuthState::Authenticated(user_id) => Some(*user_id),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated(_))
    }
}

/// Opaque session token handed to a client at login
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    fn generate() -> Self {
        let token = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(TOKEN_LEN)
            .map(char::from)
            .collect();
        Self(token)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(..)")
    }
}

/// Session-backed auth gate
#[derive(Clone)]
pub struct AuthGate {
    store: SessionStore,
    ttl: Duration,
}

impl AuthGate {
    /// Create a gate issuing sessions that live for `ttl`
    pub fn new(store: SessionStore, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    /// Session time-to-live
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Start a session for a user whose credentials were verified
    pub async fn login(&self, user_id: Uuid) -> Result<SessionToken, SessionError> {
        let token = SessionToken::generate();
        self.store.insert(token.as_str(), user_id, self.ttl).await?;

        info!("Session started for user: {}", user_id);
        Ok(token)
    }

    /// Resolve the caller behind a token
    ///
    /// Missing, unknown and expired tokens all resolve to `Anonymous`.
    pub async fn resolve(&self, token: Option<&str>) -> Result<AuthState, SessionError> {
        let Some(token) = token.filter(|token| !token.is_empty()) else {
            return Ok(AuthState::Anonymous);
        };

        Ok(match self.store.get(token).await? {
            Some(user_id) => AuthState::Authenticated(user_id),
            None => AuthState::Anonymous,
        })
    }

    /// End a session; ending an unknown session is not an error
    pub async fn logout(&self, token: &str) -> Result<(), SessionError> {
        if self.store.remove(token).await? {
            info!("Session ended");
        }
        Ok(())
    }

    /// Periodically purge expired sessions in the background
    pub fn spawn_sweeper(&self) -> JoinHandle<()> {
        let store = self.store.clone();
        let period = self.ttl.max(Duration::from_secs(1));

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                if let Err(e) = store.purge_expired().await {
                    error!("Failed to purge expired sessions: {}", e);
                }
            }
        })
    }
}
