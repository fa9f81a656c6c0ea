//! Service settings
//!
//! Loaded from built-in defaults, an optional `pinboard.toml` in the working
//! directory, then `PINBOARD__*` environment variables
//! (e.g. `PINBOARD__SESSION__TTL_SECONDS=3600`).

use auth::Cost;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// HTTP listener settings
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl ServerSettings {
    /// Socket address to bind
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Where sessions are kept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionBackend {
    Memory,
    Redis,
}

/// Session settings
#[derive(Debug, Clone, Deserialize)]
pub struct SessionSettings {
    pub ttl_seconds: u64,
    pub backend: SessionBackend,
}

impl SessionSettings {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }
}

/// Service settings
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub session: SessionSettings,
    pub credentials: Cost,
}

impl Settings {
    /// Load settings from defaults, `pinboard.toml` and the environment
    pub fn load() -> Result<Self, ConfigError> {
        let defaults = Cost::default();

        Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000_i64)?
            .set_default("session.ttl_seconds", 60_i64)?
            .set_default("session.backend", "memory")?
            .set_default("credentials.iterations", i64::from(defaults.iterations))?
            .set_default("credentials.memory_kib", i64::from(defaults.memory_kib))?
            .add_source(File::with_name("pinboard").required(false))
            .add_source(
                Environment::with_prefix("PINBOARD")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
