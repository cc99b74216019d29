//! Shared fixture: two tenants, three users and a SuperAdmin, all on the
//! in-memory store and cache.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use gwadmin_auth::{
    AccessGuard, BruteForceGuard, Directory, LocalPasswordVerifier, LoginOrchestrator,
    LoginRequest, PasswordHasher, SessionTokenStore, SuperAdminVerifier, VerifierRegistry,
};
use gwadmin_cache::memory::MemoryCacheProvider;
use gwadmin_core::config::{BruteForceConfig, MemoryCacheConfig, SessionConfig, SuperAdminConfig};
use gwadmin_core::traits::cache::CacheProvider;
use gwadmin_database::{MemoryDatabase, Stores};
use gwadmin_entity::tenant::CreateTenant;
use gwadmin_entity::user::CreateUser;
use gwadmin_entity::{Role, Tenant, User};

pub const IP: &str = "1.2.3.4";

pub struct Fixture {
    pub db: Arc<MemoryDatabase>,
    pub cache: Arc<dyn CacheProvider>,
    pub directory: Directory,
    pub access: AccessGuard,
    pub login: LoginOrchestrator,
    pub tenant_a: Tenant,
    pub tenant_b: Tenant,
    /// NormalUser of tenant A, password `alice-pw`.
    pub alice: User,
    /// TenantAdmin of tenant A, password `adam-pw`.
    pub adam: User,
    /// TenantAdmin of tenant B, password `bob-pw`.
    pub bob: User,
}

pub fn brute_force() -> BruteForceConfig {
    BruteForceConfig {
        enabled: true,
        max_failed_attempts: 3,
        lockout_duration_minutes: 5,
        ip_reputation_threshold: 10,
    }
}

impl Fixture {
    pub async fn new() -> Self {
        Self::with(true, brute_force()).await
    }

    pub async fn with(multi_tenant: bool, brute_force: BruteForceConfig) -> Self {
        let hasher = PasswordHasher::with_params(256, 1, 1).unwrap();
        let db = Arc::new(MemoryDatabase::new());
        let stores = Stores::memory(db.clone());
        let cache: Arc<dyn CacheProvider> =
            Arc::new(MemoryCacheProvider::new(&MemoryCacheConfig { max_capacity: 10_000 }));

        let tenant_a = stores
            .tenants
            .create(&CreateTenant {
                name: "Acme".into(),
                web_domain: "a.example.com".into(),
                is_default: true,
                ..Default::default()
            })
            .await
            .unwrap();
        let tenant_b = stores
            .tenants
            .create(&CreateTenant {
                name: "Beta".into(),
                web_domain: "b.example.com".into(),
                ..Default::default()
            })
            .await
            .unwrap();

        let user = |name: &str, login: &str, tenant: i64, role: Role, pw: &str| {
            CreateUser::new(name, login, tenant, role)
                .with_password_hash(hasher.hash_password(pw).unwrap())
        };
        let alice = stores
            .users
            .create(&user("Alice", "alice@a.example.com", tenant_a.id, Role::NormalUser, "alice-pw"))
            .await
            .unwrap();
        let adam = stores
            .users
            .create(&user("Adam", "adam@a.example.com", tenant_a.id, Role::TenantAdmin, "adam-pw"))
            .await
            .unwrap();
        let bob = stores
            .users
            .create(&user("Bob", "bob@b.example.com", tenant_b.id, Role::TenantAdmin, "bob-pw"))
            .await
            .unwrap();

        let sessions = SessionTokenStore::new(cache.clone(), &SessionConfig::default());
        let directory = Directory::new(
            stores.clone(),
            cache.clone(),
            Duration::from_secs(300),
            sessions,
        );

        let super_admin = SuperAdminConfig {
            login: "root".into(),
            password_hash: hasher.hash_password("root-pw").unwrap(),
        };
        let verifiers = VerifierRegistry::new()
            .with(Arc::new(SuperAdminVerifier::new(super_admin, hasher.clone())))
            .with(Arc::new(LocalPasswordVerifier::new(
                stores.users.clone(),
                hasher.clone(),
            )));

        let guard = BruteForceGuard::new(stores.blocks.clone(), stores.users.clone(), brute_force);
        let login = LoginOrchestrator::new(guard, directory.clone(), verifiers, multi_tenant, 30);

        Self {
            db,
            cache,
            access: AccessGuard::new(directory.clone()),
            directory,
            login,
            tenant_a,
            tenant_b,
            alice,
            adam,
            bob,
        }
    }

    /// Log in from [`IP`] and return the token.
    pub async fn token(&self, login: &str, password: &str, domain: &str) -> String {
        self.login
            .authenticate(&request(login, password, domain))
            .await
            .unwrap()
            .token
    }
}

pub fn request(login: &str, password: &str, domain: &str) -> LoginRequest {
    LoginRequest {
        login: login.to_string(),
        password: password.to_string(),
        sign_me: false,
        source_ip: IP.to_string(),
        web_domain: Some(domain.to_string()),
    }
}
