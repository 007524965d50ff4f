//! Adapter selection for the auth service.
//!
//! PostgreSQL and Redis are used when configured; otherwise the process
//! runs on in-memory stores and says so loudly, since nothing survives a
//! restart.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use tracing::{info, warn};

use backend::domain::ports::{SessionStore, UserRepository};
use backend::domain::{AuthServicePorts, SessionAuthService};
use backend::outbound::hashing::Argon2Hasher;
use backend::outbound::persistence::{
    DbPool, DieselUserRepository, InMemoryUserRepository, PoolConfig, run_pending_migrations,
};
use backend::outbound::session::{InMemorySessionStore, RedisSessionStore};
use backend::outbound::storage::LocalObjectStore;

use super::config::{AppSettings, SettingsError};

const REDIS_POOL_SIZE: u32 = 16;

/// Failures while wiring adapters at startup.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error("database migrations failed: {0}")]
    Migrations(#[from] backend::outbound::persistence::MigrationError),
    #[error("database pool: {0}")]
    Database(#[from] backend::outbound::persistence::PoolError),
    #[error("session store: {0}")]
    Sessions(#[from] backend::domain::ports::SessionStoreError),
    #[error("upload storage: {0}")]
    Uploads(#[from] backend::domain::ports::ObjectStoreError),
    #[error("password hashing: {0}")]
    Hashing(#[from] backend::domain::ports::HashingError),
}

impl From<StartupError> for std::io::Error {
    fn from(error: StartupError) -> Self {
        Self::other(error.to_string())
    }
}

async fn user_repository(
    settings: &AppSettings,
    clock: Arc<dyn Clock>,
) -> Result<Arc<dyn UserRepository>, StartupError> {
    let Some(database_url) = settings.database_url() else {
        warn!("no database URL configured; users are kept in memory and lost on restart");
        return Ok(Arc::new(InMemoryUserRepository::new(clock)));
    };
    run_pending_migrations(database_url).await?;
    let pool = DbPool::new(PoolConfig::new(database_url)).await?;
    info!("user store: postgres");
    Ok(Arc::new(DieselUserRepository::new(pool)))
}

async fn session_store(
    settings: &AppSettings,
    clock: Arc<dyn Clock>,
) -> Result<Arc<dyn SessionStore>, StartupError> {
    let Some(redis_url) = settings.redis_url() else {
        warn!("no Redis URL configured; sessions are kept in memory and lost on restart");
        return Ok(Arc::new(InMemorySessionStore::new(clock)));
    };
    let store = RedisSessionStore::connect(redis_url, REDIS_POOL_SIZE).await?;
    info!("session store: redis");
    Ok(Arc::new(store))
}

/// Build the auth service from settings.
pub async fn build_auth_service(
    settings: &AppSettings,
) -> Result<SessionAuthService, StartupError> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let users = user_repository(settings, clock.clone()).await?;
    let sessions = session_store(settings, clock.clone()).await?;
    let upload_dir = settings.upload_dir();
    let objects = LocalObjectStore::open(&upload_dir, settings.public_upload_base()?)?;
    info!(path = %upload_dir.display(), "upload directory ready");
    let hasher = Argon2Hasher::new(settings.argon2())?;

    Ok(SessionAuthService::new(
        AuthServicePorts {
            users,
            sessions,
            objects: Arc::new(objects),
            hasher: Arc::new(hasher),
        },
        clock,
    )
    .with_session_ttl(settings.session_ttl()?))
}
