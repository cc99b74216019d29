//! Storage traits per aggregate.
//!
//! Lookups return `Ok(None)` on a miss; only infrastructure failures and
//! constraint violations are errors. Deletes report whether a row was
//! removed so callers can stay idempotent.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use gwadmin_core::result::AppResult;
use gwadmin_entity::channel::CreateChannel;
use gwadmin_entity::group::CreateGroup;
use gwadmin_entity::tenant::CreateTenant;
use gwadmin_entity::user::CreateUser;
use gwadmin_entity::{Channel, Group, Tenant, User, UserBlock};

use crate::connection::DatabasePool;
use crate::memory::MemoryDatabase;
use crate::repositories::{
    ChannelRepository, GroupRepository, TenantRepository, UserBlockRepository, UserRepository,
};

#[async_trait]
pub trait ChannelStore: Send + Sync + std::fmt::Debug {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Channel>>;

    /// Create a channel. A duplicate login is `AlreadyExists`.
    async fn create(&self, data: &CreateChannel) -> AppResult<Channel>;

    async fn delete(&self, id: i64) -> AppResult<bool>;
}

#[async_trait]
pub trait TenantStore: Send + Sync + std::fmt::Debug {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Tenant>>;

    /// Case-insensitive match on `web_domain`.
    async fn find_by_web_domain(&self, domain: &str) -> AppResult<Option<Tenant>>;

    /// The tenant flagged `is_default`, lowest id first if several are.
    async fn find_default(&self) -> AppResult<Option<Tenant>>;

    async fn find_by_channel(&self, channel_id: i64) -> AppResult<Vec<Tenant>>;

    /// Create a tenant. A duplicate name is `AlreadyExists`; an unknown
    /// non-zero channel is `InvalidInputParameter`.
    async fn create(&self, data: &CreateTenant) -> AppResult<Tenant>;

    async fn delete(&self, id: i64) -> AppResult<bool>;
}

#[async_trait]
pub trait UserStore: Send + Sync + std::fmt::Debug {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>>;

    /// Case-insensitive match on `public_id`.
    async fn find_by_public_id(&self, public_id: &str) -> AppResult<Option<User>>;

    async fn find_by_tenant(&self, tenant_id: i64) -> AppResult<Vec<User>>;

    /// Create a user. A duplicate public id is `AlreadyExists`; a
    /// `SuperAdmin` role or unknown tenant is `InvalidInputParameter`.
    async fn create(&self, data: &CreateUser) -> AppResult<User>;

    /// Bump `logins_count` and set `last_login` in one step.
    async fn record_login(&self, id: i64, at: DateTime<Utc>) -> AppResult<()>;

    /// Delete a user together with its group memberships.
    async fn delete(&self, id: i64) -> AppResult<bool>;
}

#[async_trait]
pub trait GroupStore: Send + Sync + std::fmt::Debug {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Group>>;

    async fn find_by_tenant(&self, tenant_id: i64) -> AppResult<Vec<Group>>;

    /// Create a group. A duplicate name inside the tenant is `AlreadyExists`.
    async fn create(&self, data: &CreateGroup) -> AppResult<Group>;

    /// Add a membership. Adding an existing member is a no-op.
    async fn add_member(&self, group_id: i64, user_id: i64) -> AppResult<()>;

    /// User ids of the group's members.
    async fn members(&self, group_id: i64) -> AppResult<Vec<i64>>;

    /// Delete every group of the tenant and their memberships as one unit.
    async fn delete_by_tenant(&self, tenant_id: i64) -> AppResult<u64>;
}

#[async_trait]
pub trait UserBlockStore: Send + Sync + std::fmt::Debug {
    async fn find(&self, email: &str, ip_address: &str) -> AppResult<Option<UserBlock>>;

    /// Insert the pair's row or increment its counter, atomically, and set
    /// its time to `at`. A known `user_id` is kept for audit.
    async fn record_failure(
        &self,
        email: &str,
        ip_address: &str,
        user_id: Option<i64>,
        at: DateTime<Utc>,
    ) -> AppResult<UserBlock>;

    async fn delete(&self, email: &str, ip_address: &str) -> AppResult<bool>;

    /// Delete the pair's row only if its last failure is no later than
    /// `last_failure`, so a failure recorded meanwhile survives.
    async fn delete_stale(
        &self,
        email: &str,
        ip_address: &str,
        last_failure: DateTime<Utc>,
    ) -> AppResult<bool>;

    /// Delete every row resolved to the user or typed with its login.
    async fn delete_for_user(&self, user_id: i64, email: &str) -> AppResult<u64>;

    /// Last-failure times of the address's rows with at least `threshold`
    /// failures and a last failure after `since`, oldest first.
    async fn locked_times_for_ip(
        &self,
        ip_address: &str,
        threshold: i32,
        since: DateTime<Utc>,
    ) -> AppResult<Vec<DateTime<Utc>>>;
}

/// Every store behind one cloneable handle.
#[derive(Debug, Clone)]
pub struct Stores {
    pub channels: Arc<dyn ChannelStore>,
    pub tenants: Arc<dyn TenantStore>,
    pub users: Arc<dyn UserStore>,
    pub groups: Arc<dyn GroupStore>,
    pub blocks: Arc<dyn UserBlockStore>,
}

impl Stores {
    /// PostgreSQL-backed stores sharing one pool.
    pub fn postgres(db: &DatabasePool) -> Self {
        let pool = db.pool().clone();
        Self {
            channels: Arc::new(ChannelRepository::new(pool.clone())),
            tenants: Arc::new(TenantRepository::new(pool.clone())),
            users: Arc::new(UserRepository::new(pool.clone())),
            groups: Arc::new(GroupRepository::new(pool.clone())),
            blocks: Arc::new(UserBlockRepository::new(pool)),
        }
    }

    /// Stores backed by one in-process database.
    pub fn memory(db: Arc<MemoryDatabase>) -> Self {
        Self {
            channels: db.clone(),
            tenants: db.clone(),
            users: db.clone(),
            groups: db.clone(),
            blocks: db,
        }
    }
}
