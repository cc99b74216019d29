//! In-process implementation of every store trait.
//!
//! All tables live behind one async mutex, so each operation (including
//! the block-counter upsert) is atomic with respect to the others. The
//! uniqueness and reference checks mirror the PostgreSQL schema.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use gwadmin_core::error::AppError;
use gwadmin_core::result::AppResult;
use gwadmin_entity::channel::CreateChannel;
use gwadmin_entity::group::CreateGroup;
use gwadmin_entity::tenant::CreateTenant;
use gwadmin_entity::user::CreateUser;
use gwadmin_entity::{Channel, Group, Properties, Role, Tenant, User, UserBlock};

use crate::store::{ChannelStore, GroupStore, TenantStore, UserBlockStore, UserStore};

#[derive(Debug, Default)]
struct MemoryState {
    next_id: i64,
    channels: BTreeMap<i64, Channel>,
    tenants: BTreeMap<i64, Tenant>,
    users: BTreeMap<i64, User>,
    groups: BTreeMap<i64, Group>,
    group_users: BTreeSet<(i64, i64)>,
    blocks: BTreeMap<(String, String), UserBlock>,
}

impl MemoryState {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Database held entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryDatabase {
    state: Mutex<MemoryState>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the last-failure time of a block row into the past.
    ///
    /// Returns false when the pair has no row.
    pub async fn backdate_block(&self, email: &str, ip_address: &str, by: Duration) -> bool {
        let mut state = self.state.lock().await;
        match state
            .blocks
            .get_mut(&(email.to_string(), ip_address.to_string()))
        {
            Some(block) => {
                block.time -= by;
                true
            }
            None => false,
        }
    }

    /// Number of block rows currently stored.
    pub async fn block_count(&self) -> usize {
        self.state.lock().await.blocks.len()
    }

    /// Replace a tenant row, e.g. to flip its flags.
    pub async fn put_tenant(&self, tenant: Tenant) {
        self.state.lock().await.tenants.insert(tenant.id, tenant);
    }

    /// Replace a user row, e.g. to flip its flags.
    pub async fn put_user(&self, user: User) {
        self.state.lock().await.users.insert(user.id, user);
    }
}

#[async_trait]
impl ChannelStore for MemoryDatabase {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Channel>> {
        Ok(self.state.lock().await.channels.get(&id).cloned())
    }

    async fn create(&self, data: &CreateChannel) -> AppResult<Channel> {
        let mut state = self.state.lock().await;
        if state.channels.values().any(|c| c.login == data.login) {
            return Err(AppError::already_exists(format!(
                "Channel '{}' already exists",
                data.login
            )));
        }
        let channel = Channel {
            id: state.next_id(),
            login: data.login.clone(),
            password: data.password.clone(),
            description: data.description.clone(),
        };
        state.channels.insert(channel.id, channel.clone());
        Ok(channel)
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        Ok(self.state.lock().await.channels.remove(&id).is_some())
    }
}

#[async_trait]
impl TenantStore for MemoryDatabase {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Tenant>> {
        Ok(self.state.lock().await.tenants.get(&id).cloned())
    }

    async fn find_by_web_domain(&self, domain: &str) -> AppResult<Option<Tenant>> {
        let state = self.state.lock().await;
        Ok(state
            .tenants
            .values()
            .find(|t| t.serves_domain(domain))
            .cloned())
    }

    async fn find_default(&self) -> AppResult<Option<Tenant>> {
        let state = self.state.lock().await;
        Ok(state.tenants.values().find(|t| t.is_default).cloned())
    }

    async fn find_by_channel(&self, channel_id: i64) -> AppResult<Vec<Tenant>> {
        let state = self.state.lock().await;
        Ok(state
            .tenants
            .values()
            .filter(|t| t.channel_id == channel_id)
            .cloned()
            .collect())
    }

    async fn create(&self, data: &CreateTenant) -> AppResult<Tenant> {
        let mut state = self.state.lock().await;
        if data.channel_id != 0 && !state.channels.contains_key(&data.channel_id) {
            return Err(AppError::invalid_input(format!(
                "Channel {} does not exist",
                data.channel_id
            )));
        }
        if state.tenants.values().any(|t| t.name == data.name) {
            return Err(AppError::already_exists(format!(
                "Tenant '{}' already exists",
                data.name
            )));
        }
        let tenant = Tenant {
            id: state.next_id(),
            channel_id: data.channel_id,
            is_disabled: data.is_disabled,
            is_default: data.is_default,
            name: data.name.clone(),
            description: data.description.clone(),
            web_domain: data.web_domain.clone(),
            properties: data.properties.clone(),
        };
        state.tenants.insert(tenant.id, tenant.clone());
        Ok(tenant)
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let mut state = self.state.lock().await;
        let referenced = state.users.values().any(|u| u.tenant_id == id)
            || state.groups.values().any(|g| g.tenant_id == id);
        if referenced {
            return Err(AppError::database(format!(
                "Tenant {id} is still referenced by users or groups"
            )));
        }
        Ok(state.tenants.remove(&id).is_some())
    }
}

#[async_trait]
impl UserStore for MemoryDatabase {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        Ok(self.state.lock().await.users.get(&id).cloned())
    }

    async fn find_by_public_id(&self, public_id: &str) -> AppResult<Option<User>> {
        let state = self.state.lock().await;
        Ok(state
            .users
            .values()
            .find(|u| u.public_id.eq_ignore_ascii_case(public_id))
            .cloned())
    }

    async fn find_by_tenant(&self, tenant_id: i64) -> AppResult<Vec<User>> {
        let state = self.state.lock().await;
        Ok(state
            .users
            .values()
            .filter(|u| u.tenant_id == tenant_id)
            .cloned()
            .collect())
    }

    async fn create(&self, data: &CreateUser) -> AppResult<User> {
        if data.role == Role::SuperAdmin {
            return Err(AppError::invalid_input(
                "The SuperAdmin role cannot be assigned to a stored user",
            ));
        }
        let mut state = self.state.lock().await;
        if !state.tenants.contains_key(&data.tenant_id) {
            return Err(AppError::invalid_input(format!(
                "Tenant {} does not exist",
                data.tenant_id
            )));
        }
        if state
            .users
            .values()
            .any(|u| u.public_id.eq_ignore_ascii_case(&data.public_id))
        {
            return Err(AppError::already_exists(format!(
                "User '{}' already exists",
                data.public_id
            )));
        }
        let user = User {
            id: state.next_id(),
            uuid: Uuid::new_v4(),
            name: data.name.clone(),
            public_id: data.public_id.clone(),
            password_hash: data.password_hash.clone(),
            tenant_id: data.tenant_id,
            is_disabled: false,
            role: data.role,
            last_login: None,
            logins_count: 0,
            language: data.language.clone(),
            time_format: data.time_format.clone(),
            date_format: data.date_format.clone(),
            write_separate_log: false,
            note: String::new(),
            properties: Properties::default(),
        };
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn record_login(&self, id: i64, at: DateTime<Utc>) -> AppResult<()> {
        let mut state = self.state.lock().await;
        if let Some(user) = state.users.get_mut(&id) {
            user.last_login = Some(at);
            user.logins_count += 1;
        }
        Ok(())
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let mut state = self.state.lock().await;
        state.group_users.retain(|(_, user_id)| *user_id != id);
        Ok(state.users.remove(&id).is_some())
    }
}

#[async_trait]
impl GroupStore for MemoryDatabase {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Group>> {
        Ok(self.state.lock().await.groups.get(&id).cloned())
    }

    async fn find_by_tenant(&self, tenant_id: i64) -> AppResult<Vec<Group>> {
        let state = self.state.lock().await;
        Ok(state
            .groups
            .values()
            .filter(|g| g.tenant_id == tenant_id)
            .cloned()
            .collect())
    }

    async fn create(&self, data: &CreateGroup) -> AppResult<Group> {
        let mut state = self.state.lock().await;
        if !state.tenants.contains_key(&data.tenant_id) {
            return Err(AppError::invalid_input(format!(
                "Tenant {} does not exist",
                data.tenant_id
            )));
        }
        if state
            .groups
            .values()
            .any(|g| g.tenant_id == data.tenant_id && g.name == data.name)
        {
            return Err(AppError::already_exists(format!(
                "Group '{}' already exists",
                data.name
            )));
        }
        let group = Group {
            id: state.next_id(),
            tenant_id: data.tenant_id,
            name: data.name.clone(),
            is_all: data.is_all,
            properties: data.properties.clone(),
        };
        state.groups.insert(group.id, group.clone());
        Ok(group)
    }

    async fn add_member(&self, group_id: i64, user_id: i64) -> AppResult<()> {
        let mut state = self.state.lock().await;
        if !state.groups.contains_key(&group_id) || !state.users.contains_key(&user_id) {
            return Err(AppError::not_found(format!(
                "Group {group_id} or user {user_id} not found"
            )));
        }
        state.group_users.insert((group_id, user_id));
        Ok(())
    }

    async fn members(&self, group_id: i64) -> AppResult<Vec<i64>> {
        let state = self.state.lock().await;
        Ok(state
            .group_users
            .iter()
            .filter(|(g, _)| *g == group_id)
            .map(|(_, u)| *u)
            .collect())
    }

    async fn delete_by_tenant(&self, tenant_id: i64) -> AppResult<u64> {
        let mut state = self.state.lock().await;
        let ids: Vec<i64> = state
            .groups
            .values()
            .filter(|g| g.tenant_id == tenant_id)
            .map(|g| g.id)
            .collect();
        state.group_users.retain(|(g, _)| !ids.contains(g));
        for id in &ids {
            state.groups.remove(id);
        }
        Ok(ids.len() as u64)
    }
}

#[async_trait]
impl UserBlockStore for MemoryDatabase {
    async fn find(&self, email: &str, ip_address: &str) -> AppResult<Option<UserBlock>> {
        let state = self.state.lock().await;
        Ok(state
            .blocks
            .get(&(email.to_string(), ip_address.to_string()))
            .cloned())
    }

    async fn record_failure(
        &self,
        email: &str,
        ip_address: &str,
        user_id: Option<i64>,
        at: DateTime<Utc>,
    ) -> AppResult<UserBlock> {
        let mut state = self.state.lock().await;
        let key = (email.to_string(), ip_address.to_string());
        let block = match state.blocks.get_mut(&key) {
            Some(block) => {
                block.error_logins_count += 1;
                block.time = at;
                if user_id.is_some() {
                    block.user_id = user_id;
                }
                block.clone()
            }
            None => {
                let block = UserBlock {
                    id: state.next_id(),
                    user_id,
                    email: email.to_string(),
                    ip_address: ip_address.to_string(),
                    error_logins_count: 1,
                    time: at,
                };
                state.blocks.insert(key, block.clone());
                block
            }
        };
        Ok(block)
    }

    async fn delete(&self, email: &str, ip_address: &str) -> AppResult<bool> {
        let mut state = self.state.lock().await;
        Ok(state
            .blocks
            .remove(&(email.to_string(), ip_address.to_string()))
            .is_some())
    }

    async fn delete_stale(
        &self,
        email: &str,
        ip_address: &str,
        last_failure: DateTime<Utc>,
    ) -> AppResult<bool> {
        let mut state = self.state.lock().await;
        let key = (email.to_string(), ip_address.to_string());
        if state.blocks.get(&key).is_some_and(|b| b.time <= last_failure) {
            state.blocks.remove(&key);
            return Ok(true);
        }
        Ok(false)
    }

    async fn delete_for_user(&self, user_id: i64, email: &str) -> AppResult<u64> {
        let mut state = self.state.lock().await;
        let before = state.blocks.len();
        state
            .blocks
            .retain(|_, b| b.user_id != Some(user_id) && !b.email.eq_ignore_ascii_case(email));
        Ok((before - state.blocks.len()) as u64)
    }

    async fn locked_times_for_ip(
        &self,
        ip_address: &str,
        threshold: i32,
        since: DateTime<Utc>,
    ) -> AppResult<Vec<DateTime<Utc>>> {
        let state = self.state.lock().await;
        let mut times: Vec<DateTime<Utc>> = state
            .blocks
            .values()
            .filter(|b| {
                b.ip_address == ip_address && b.error_logins_count >= threshold && b.time > since
            })
            .map(|b| b.time)
            .collect();
        times.sort();
        Ok(times)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gwadmin_core::ErrorKind;

    async fn seeded() -> (MemoryDatabase, Tenant) {
        let db = MemoryDatabase::new();
        let tenant = TenantStore::create(
            &db,
            &CreateTenant {
                name: "acme".into(),
                web_domain: "acme.example.com".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        (db, tenant)
    }

    #[tokio::test]
    async fn test_concurrent_failures_share_one_row() {
        let db = MemoryDatabase::new();
        let now = Utc::now();
        let (a, b) = tokio::join!(
            db.record_failure("a@x.com", "1.2.3.4", None, now),
            db.record_failure("a@x.com", "1.2.3.4", Some(7), now),
        );
        let mut counts = [a.unwrap().error_logins_count, b.unwrap().error_logins_count];
        counts.sort();
        assert_eq!(counts, [1, 2]);

        let block = db.find("a@x.com", "1.2.3.4").await.unwrap().unwrap();
        assert_eq!(block.error_logins_count, 2);
        assert_eq!(block.user_id, Some(7));
        assert_eq!(db.block_count().await, 1);
    }

    #[tokio::test]
    async fn test_delete_stale_spares_newer_failure() {
        let db = MemoryDatabase::new();
        let earlier = Utc::now() - Duration::minutes(10);
        let observed = db
            .record_failure("a@x.com", "1.2.3.4", None, earlier)
            .await
            .unwrap();
        db.record_failure("a@x.com", "1.2.3.4", None, Utc::now())
            .await
            .unwrap();

        assert!(!db.delete_stale("a@x.com", "1.2.3.4", observed.time).await.unwrap());
        assert_eq!(db.block_count().await, 1);

        let current = db.find("a@x.com", "1.2.3.4").await.unwrap().unwrap();
        assert!(db.delete_stale("a@x.com", "1.2.3.4", current.time).await.unwrap());
        assert_eq!(db.block_count().await, 0);
    }

    #[tokio::test]
    async fn test_record_failure_upserts_one_row_per_pair() {
        let db = MemoryDatabase::new();
        let now = Utc::now();
        for _ in 0..3 {
            db.record_failure("a@x.com", "1.2.3.4", None, now).await.unwrap();
        }
        db.record_failure("a@x.com", "5.6.7.8", None, now).await.unwrap();

        let block = db.find("a@x.com", "1.2.3.4").await.unwrap().unwrap();
        assert_eq!(block.error_logins_count, 3);
        assert_eq!(db.block_count().await, 2);
    }

    #[tokio::test]
    async fn test_user_requires_existing_tenant_and_unique_public_id() {
        let (db, tenant) = seeded().await;
        let err = UserStore::create(&db, &CreateUser::new("x", "x@acme.com", 999, Role::NormalUser))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidInputParameter);

        UserStore::create(&db, &CreateUser::new("a", "a@acme.com", tenant.id, Role::NormalUser))
            .await
            .unwrap();
        let err = UserStore::create(&db, &CreateUser::new("b", "A@ACME.com", tenant.id, Role::Customer))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::AlreadyExists);
    }

    #[tokio::test]
    async fn test_super_admin_is_never_stored() {
        let (db, tenant) = seeded().await;
        let err = UserStore::create(&db, &CreateUser::new("root", "root", tenant.id, Role::SuperAdmin))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidInputParameter);
    }

    #[tokio::test]
    async fn test_tenant_delete_refuses_dangling_users() {
        let (db, tenant) = seeded().await;
        UserStore::create(&db, &CreateUser::new("a", "a@acme.com", tenant.id, Role::NormalUser))
            .await
            .unwrap();
        assert!(TenantStore::delete(&db, tenant.id).await.is_err());
    }

    #[tokio::test]
    async fn test_locked_times_respect_threshold_and_window() {
        let db = MemoryDatabase::new();
        let now = Utc::now();
        for email in ["a@x.com", "b@x.com"] {
            for _ in 0..3 {
                db.record_failure(email, "9.9.9.9", None, now).await.unwrap();
            }
        }
        db.record_failure("c@x.com", "9.9.9.9", None, now).await.unwrap();
        db.backdate_block("b@x.com", "9.9.9.9", Duration::minutes(10)).await;

        let times = db
            .locked_times_for_ip("9.9.9.9", 3, now - Duration::minutes(5))
            .await
            .unwrap();
        assert_eq!(times, vec![now]);
    }
}
