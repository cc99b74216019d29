//! gwadmin server: groupware administration backend.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use gwadmin_api::AppState;
use gwadmin_auth::PasswordHasher;
use gwadmin_cache::CacheManager;
use gwadmin_core::config::AppConfig;
use gwadmin_core::error::AppError;
use gwadmin_core::traits::cache::CacheProvider;
use gwadmin_database::{DatabasePool, MemoryDatabase, Stores};

#[tokio::main]
async fn main() {
    let env = std::env::var("GWADMIN_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::info!(env = %env, "Configuration loaded");

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting gwadmin v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Storage ──────────────────────────────────────────
    let (stores, database) = if config.database.is_memory() {
        tracing::warn!("Using in-memory storage; data is lost on restart");
        (Stores::memory(Arc::new(MemoryDatabase::new())), None)
    } else {
        let db = DatabasePool::connect(&config.database).await?;

        gwadmin_database::migration::run_migrations(db.pool()).await?;

        (Stores::postgres(&db), Some(db))
    };

    // ── Step 2: Cache ────────────────────────────────────────────
    tracing::info!(provider = %config.cache.provider, "Initializing cache...");
    let cache: Arc<dyn CacheProvider> = Arc::new(CacheManager::new(&config.cache).await?);
    if !cache.health_check().await? {
        return Err(AppError::cache("Cache health check failed"));
    }

    // ── Step 3: Wire components and serve ────────────────────────
    let state = AppState::build(config, stores, cache, database.clone(), PasswordHasher::new())?;
    let result = gwadmin_api::serve(state).await;

    if let Some(db) = database {
        db.close().await;
    }
    result
}
