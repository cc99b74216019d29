//! In-memory fixture: channel C owning tenant A (two groups, three users)
//! and an unowned tenant B with one admin.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use gwadmin_auth::{BruteForceGuard, Directory, SessionTokenStore};
use gwadmin_cache::memory::MemoryCacheProvider;
use gwadmin_core::config::{BruteForceConfig, MemoryCacheConfig, SessionConfig};
use gwadmin_core::traits::cache::CacheProvider;
use gwadmin_database::{MemoryDatabase, Stores};
use gwadmin_entity::channel::CreateChannel;
use gwadmin_entity::group::CreateGroup;
use gwadmin_entity::session::{Identity, SessionPayload, SubjectKind};
use gwadmin_entity::tenant::CreateTenant;
use gwadmin_entity::user::CreateUser;
use gwadmin_entity::{Channel, Group, Role, Tenant, User};
use gwadmin_service::{AdminService, LifecycleCoordinator, RequestContext};

pub struct Fixture {
    pub db: Arc<MemoryDatabase>,
    pub stores: Stores,
    pub cache: Arc<dyn CacheProvider>,
    pub directory: Directory,
    pub guard: BruteForceGuard,
    pub lifecycle: LifecycleCoordinator,
    pub admin: AdminService,
    pub channel: Channel,
    pub tenant_a: Tenant,
    pub tenant_b: Tenant,
    pub groups_a: Vec<Group>,
    pub users_a: Vec<User>,
    pub admin_b: User,
}

impl Fixture {
    pub async fn new() -> Self {
        let db = Arc::new(MemoryDatabase::new());
        let stores = Stores::memory(db.clone());
        let cache: Arc<dyn CacheProvider> =
            Arc::new(MemoryCacheProvider::new(&MemoryCacheConfig { max_capacity: 10_000 }));

        let channel = stores
            .channels
            .create(&CreateChannel {
                login: "chan".into(),
                password: "generated".into(),
                description: String::new(),
            })
            .await
            .unwrap();

        let tenant_a = stores
            .tenants
            .create(&CreateTenant {
                channel_id: channel.id,
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

        let mut groups_a = Vec::new();
        for name in ["Staff", "Board"] {
            let group = stores
                .groups
                .create(&CreateGroup {
                    tenant_id: tenant_a.id,
                    name: name.into(),
                    ..Default::default()
                })
                .await
                .unwrap();
            groups_a.push(group);
        }

        let mut users_a = Vec::new();
        for (login, role) in [
            ("admin@a.example.com", Role::TenantAdmin),
            ("u1@a.example.com", Role::NormalUser),
            ("u2@a.example.com", Role::Customer),
        ] {
            let user = stores
                .users
                .create(&CreateUser::new(login, login, tenant_a.id, role))
                .await
                .unwrap();
            stores.groups.add_member(groups_a[0].id, user.id).await.unwrap();
            users_a.push(user);
        }

        let admin_b = stores
            .users
            .create(&CreateUser::new(
                "Bob",
                "bob@b.example.com",
                tenant_b.id,
                Role::TenantAdmin,
            ))
            .await
            .unwrap();

        let sessions = SessionTokenStore::new(cache.clone(), &SessionConfig::default());
        let directory = Directory::new(
            stores.clone(),
            cache.clone(),
            Duration::from_secs(300),
            sessions,
        );
        let guard = BruteForceGuard::new(
            stores.blocks.clone(),
            stores.users.clone(),
            BruteForceConfig::default(),
        );
        let lifecycle = LifecycleCoordinator::new(directory.clone(), guard.clone());
        let admin = AdminService::new(directory.clone(), lifecycle.clone());

        Self {
            db,
            stores,
            cache,
            directory,
            guard,
            lifecycle,
            admin,
            channel,
            tenant_a,
            tenant_b,
            groups_a,
            users_a,
            admin_b,
        }
    }

    pub fn as_user(&self, user: &User) -> RequestContext {
        RequestContext::new(Identity::Regular(user.clone()), "10.0.0.1")
    }

    pub fn as_super_admin(&self) -> RequestContext {
        RequestContext::new(Identity::SuperAdmin, "10.0.0.1")
    }

    /// Issue a session for a user and return its token.
    pub async fn session_for(&self, user: &User) -> String {
        let payload = SessionPayload::new(SubjectKind::User, user.id, false, 30);
        self.directory
            .sessions()
            .issue(&payload, false)
            .await
            .unwrap()
    }
}
