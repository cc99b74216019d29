//! Tenant/User directory.
//!
//! Read-only accessors every other component uses to turn a token, id or
//! host name into an identity or tenant. Misses are `Ok(None)`; callers
//! decide whether absence is anonymous, not-found or denied.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use gwadmin_cache::keys;
use gwadmin_core::result::AppResult;
use gwadmin_core::traits::cache::CacheProvider;
use gwadmin_database::Stores;
use gwadmin_entity::session::{Identity, SubjectKind};
use gwadmin_entity::{Group, Tenant, User};

use crate::session::SessionTokenStore;

/// Application-scoped directory over the stores and the tenant memo cache.
#[derive(Debug, Clone)]
pub struct Directory {
    stores: Stores,
    cache: Arc<dyn CacheProvider>,
    memo_ttl: Duration,
    sessions: SessionTokenStore,
}

impl Directory {
    pub fn new(
        stores: Stores,
        cache: Arc<dyn CacheProvider>,
        memo_ttl: Duration,
        sessions: SessionTokenStore,
    ) -> Self {
        Self {
            stores,
            cache,
            memo_ttl,
            sessions,
        }
    }

    pub fn stores(&self) -> &Stores {
        &self.stores
    }

    pub fn sessions(&self) -> &SessionTokenStore {
        &self.sessions
    }

    /// Resolve a session token to the identity it was issued to.
    ///
    /// The SuperAdmin is synthesized. Users that were deleted or disabled
    /// since the token was issued, or whose tenant was, resolve to `None`.
    pub async fn resolve_user_by_token(&self, token: &str) -> AppResult<Option<Identity>> {
        let Some(payload) = self.sessions.validate(token).await? else {
            return Ok(None);
        };

        match payload.subject_kind {
            SubjectKind::SuperAdmin => Ok(Some(Identity::SuperAdmin)),
            SubjectKind::User => {
                let Some(user) = self
                    .resolve_user_by_id(payload.user_id)
                    .await?
                    .filter(User::can_login)
                else {
                    return Ok(None);
                };
                let tenant_active = self
                    .resolve_tenant_by_id(user.tenant_id)
                    .await?
                    .is_some_and(|t| !t.is_disabled);
                Ok(tenant_active.then_some(Identity::Regular(user)))
            }
        }
    }

    pub async fn resolve_user_by_id(&self, id: i64) -> AppResult<Option<User>> {
        self.stores.users.find_by_id(id).await
    }

    /// Case-insensitive lookup by login.
    pub async fn resolve_user_by_public_id(&self, public_id: &str) -> AppResult<Option<User>> {
        self.stores.users.find_by_public_id(public_id.trim()).await
    }

    pub async fn resolve_tenant_by_id(&self, id: i64) -> AppResult<Option<Tenant>> {
        self.stores.tenants.find_by_id(id).await
    }

    /// Tenant whose web domain equals `domain`, ignoring case.
    ///
    /// The matching tenant id is memoised; a memo pointing at a tenant
    /// that no longer exists is treated as a miss and dropped.
    pub async fn resolve_tenant_by_web_domain(&self, domain: &str) -> AppResult<Option<Tenant>> {
        let domain = domain.trim();
        if domain.is_empty() {
            return Ok(None);
        }

        let key = keys::tenant_by_domain(domain);
        if let Some(raw) = self.cache.get(&key).await? {
            if let Ok(id) = raw.parse::<i64>() {
                if let Some(tenant) = self.stores.tenants.find_by_id(id).await? {
                    debug!(domain, tenant_id = id, "Tenant memo hit");
                    return Ok(Some(tenant));
                }
            }
            self.cache.delete(&key).await?;
        }

        let tenant = self.stores.tenants.find_by_web_domain(domain).await?;
        if let Some(tenant) = &tenant {
            self.cache
                .set(&key, &tenant.id.to_string(), Some(self.memo_ttl))
                .await?;
            debug!(domain, tenant_id = tenant.id, "Tenant memo stored");
        }
        Ok(tenant)
    }

    pub async fn default_tenant(&self) -> AppResult<Option<Tenant>> {
        self.stores.tenants.find_default().await
    }

    /// Tenant serving a request host, falling back to the default tenant.
    pub async fn tenant_for_request_domain(&self, domain: Option<&str>) -> AppResult<Option<Tenant>> {
        if let Some(domain) = domain {
            if let Some(tenant) = self.resolve_tenant_by_web_domain(host_name(domain)).await? {
                return Ok(Some(tenant));
            }
        }
        self.default_tenant().await
    }

    pub async fn resolve_group_by_id(&self, id: i64) -> AppResult<Option<Group>> {
        self.stores.groups.find_by_id(id).await
    }

    pub async fn is_group_member(&self, group_id: i64, user_id: i64) -> AppResult<bool> {
        Ok(self.stores.groups.members(group_id).await?.contains(&user_id))
    }

    /// Drop every memoised tenant lookup.
    pub async fn invalidate_tenant_cache(&self) -> AppResult<u64> {
        self.cache.delete_pattern(&keys::tenant_pattern()).await
    }
}

/// Strip a `:port` suffix from a Host header value.
fn host_name(host: &str) -> &str {
    match host.rsplit_once(':') {
        Some((name, port))
            if !port.is_empty()
                && port.chars().all(|c| c.is_ascii_digit())
                && (!name.contains(':') || name.ends_with(']')) =>
        {
            name
        }
        _ => host,
    }
}
