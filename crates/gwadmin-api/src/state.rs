//! Application state shared across all handlers.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use gwadmin_auth::{
    AccessGuard, BruteForceGuard, Directory, LocalPasswordVerifier, LoginOrchestrator,
    PasswordHasher, SessionTokenStore, SuperAdminVerifier, VerifierRegistry,
};
use gwadmin_core::config::AppConfig;
use gwadmin_core::result::AppResult;
use gwadmin_core::traits::cache::CacheProvider;
use gwadmin_database::{DatabasePool, Stores};
use gwadmin_service::{AdminService, LifecycleCoordinator};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`. Every component is
/// built once here at startup; nothing is looked up through globals.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// PostgreSQL pool, absent in in-memory mode.
    pub database: Option<DatabasePool>,
    /// Key-value cache holding sessions and tenant memos.
    pub cache: Arc<dyn CacheProvider>,
    pub directory: Directory,
    pub access: AccessGuard,
    pub login: LoginOrchestrator,
    pub admin: AdminService,
}

impl AppState {
    /// Wire every component from configuration, stores and cache.
    pub fn build(
        config: AppConfig,
        stores: Stores,
        cache: Arc<dyn CacheProvider>,
        database: Option<DatabasePool>,
        hasher: PasswordHasher,
    ) -> AppResult<Self> {
        let sessions = SessionTokenStore::new(cache.clone(), &config.session);
        let directory = Directory::new(
            stores.clone(),
            cache.clone(),
            Duration::from_secs(config.cache.default_ttl_seconds),
            sessions,
        );

        let brute_force = BruteForceGuard::new(
            stores.blocks.clone(),
            stores.users.clone(),
            config.auth.brute_force.clone(),
        );

        let mut verifiers = VerifierRegistry::new();
        if config.auth.super_admin.is_configured() {
            PasswordHasher::validate_hash(&config.auth.super_admin.password_hash)?;
            verifiers.register(Arc::new(SuperAdminVerifier::new(
                config.auth.super_admin.clone(),
                hasher.clone(),
            )));
        } else {
            warn!("No SuperAdmin login configured");
        }
        verifiers.register(Arc::new(LocalPasswordVerifier::new(
            stores.users.clone(),
            hasher,
        )));
        info!(
            verifiers = verifiers.len(),
            brute_force = brute_force.is_enabled(),
            multi_tenant = config.tenancy.multi_tenant,
            "Authentication wired"
        );

        let login = LoginOrchestrator::new(
            brute_force.clone(),
            directory.clone(),
            verifiers,
            config.tenancy.multi_tenant,
            config.session.persistent_days,
        );
        let lifecycle = LifecycleCoordinator::new(directory.clone(), brute_force);
        let admin = AdminService::new(directory.clone(), lifecycle);

        Ok(Self {
            config: Arc::new(config),
            database,
            cache,
            access: AccessGuard::new(directory.clone()),
            directory,
            login,
            admin,
        })
    }
}
