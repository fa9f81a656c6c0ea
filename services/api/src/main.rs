use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use api::{
    AppState,
    config::{SessionBackend, Settings},
    routes,
};
use auth::{AuthGate, CredentialService, MemorySessionStore, RedisSessionStore, SessionStore};
use common::{
    cache::{RedisConfig, RedisPool},
    database::{self, DatabaseConfig},
};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting Pinboard API service");

    let settings = Settings::load()?;

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = database::init_pool(&db_config).await?;
    database::run_migrations(&pool).await?;

    // Check database connectivity
    if database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    let credentials = CredentialService::new(settings.credentials)?;

    let session_store = match settings.session.backend {
        SessionBackend::Memory => SessionStore::Memory(MemorySessionStore::new()),
        SessionBackend::Redis => {
            let redis_config = RedisConfig::from_env()?;
            let redis_pool = RedisPool::new(&redis_config).await?;
            SessionStore::Redis(RedisSessionStore::new(redis_pool))
        }
    };
    let auth_gate = AuthGate::new(session_store, settings.session.ttl());
    let sweeper = auth_gate.spawn_sweeper();

    info!(
        "Sessions: {:?} backend, ttl {}s",
        settings.session.backend, settings.session.ttl_seconds
    );

    let app_state = AppState::new(pool.clone(), credentials, auth_gate);
    let app = routes::create_router(app_state);

    let address = settings.server.address();
    let listener = TcpListener::bind(&address).await?;
    info!("API service listening on {}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutting down API service");
    sweeper.abort();
    database::close(&pool).await;

    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = terminate.recv() => {},
                }
            }
            Err(_) => {
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
