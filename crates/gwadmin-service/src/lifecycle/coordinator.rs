//! Cascading lifecycle coordinator.

use tracing::{debug, error, info};

use gwadmin_auth::{BruteForceGuard, Directory};
use gwadmin_core::error::AppError;
use gwadmin_core::result::AppResult;
use gwadmin_database::Stores;

/// Deletes aggregates together with everything they own.
///
/// Each step tolerates the absence of what it deletes, so re-running an
/// interrupted cascade completes it. Deleting an id that does not exist is
/// a successful no-op.
#[derive(Debug, Clone)]
pub struct LifecycleCoordinator {
    directory: Directory,
    brute_force: BruteForceGuard,
}

impl LifecycleCoordinator {
    pub fn new(directory: Directory, brute_force: BruteForceGuard) -> Self {
        Self {
            directory,
            brute_force,
        }
    }

    fn stores(&self) -> &Stores {
        self.directory.stores()
    }

    /// Delete a channel and, when `cascade` is set, its tenants.
    ///
    /// A channel that still owns tenants is refused with
    /// `InvalidInputParameter` unless the caller asked for the cascade.
    pub async fn delete_channel(&self, id: i64, cascade: bool) -> AppResult<()> {
        if self.stores().channels.find_by_id(id).await?.is_none() {
            debug!(channel_id = id, "Channel already absent");
            return Ok(());
        }

        let tenants = self.stores().tenants.find_by_channel(id).await?;
        if !tenants.is_empty() && !cascade {
            return Err(AppError::invalid_input(format!(
                "Channel {id} still owns {} tenant(s)",
                tenants.len()
            )));
        }

        for tenant in &tenants {
            self.delete_tenant(tenant.id)
                .await
                .map_err(|e| step_failed("channel", id, "tenants", e))?;
        }

        self.stores()
            .channels
            .delete(id)
            .await
            .map_err(|e| step_failed("channel", id, "channel row", e))?;

        info!(channel_id = id, tenants = tenants.len(), "Channel deleted");
        Ok(())
    }

    /// Delete a tenant: its groups, then its users, then the tenant row.
    pub async fn delete_tenant(&self, id: i64) -> AppResult<()> {
        let Some(tenant) = self.stores().tenants.find_by_id(id).await? else {
            debug!(tenant_id = id, "Tenant already absent");
            return Ok(());
        };

        let groups = self
            .stores()
            .groups
            .delete_by_tenant(id)
            .await
            .map_err(|e| step_failed("tenant", id, "groups", e))?;

        let users = self
            .stores()
            .users
            .find_by_tenant(id)
            .await
            .map_err(|e| step_failed("tenant", id, "users", e))?;
        for user in &users {
            self.delete_user(user.id)
                .await
                .map_err(|e| step_failed("tenant", id, "users", e))?;
        }

        self.stores()
            .tenants
            .delete(id)
            .await
            .map_err(|e| step_failed("tenant", id, "tenant row", e))?;
        self.directory.invalidate_tenant_cache().await?;

        info!(
            tenant_id = id,
            tenant = %tenant.name,
            groups,
            users = users.len(),
            "Tenant deleted"
        );
        Ok(())
    }

    /// Delete a user after revoking its sessions and purging its login
    /// blocks.
    pub async fn delete_user(&self, id: i64) -> AppResult<()> {
        let Some(user) = self.stores().users.find_by_id(id).await? else {
            debug!(user_id = id, "User already absent");
            return Ok(());
        };

        let sessions = self.directory.sessions().revoke_all_for_user(id).await?;
        let blocks = self.brute_force.purge_user(id, &user.public_id).await?;
        self.stores().users.delete(id).await?;

        info!(
            user_id = id,
            tenant_id = user.tenant_id,
            sessions,
            blocks,
            "User deleted"
        );
        Ok(())
    }
}

/// Wrap a child failure into one failure of the aggregate being deleted.
fn step_failed(aggregate: &str, id: i64, step: &str, err: AppError) -> AppError {
    error!(aggregate, id, step, error = %err, "Cascading delete failed");
    let kind = err.kind;
    AppError::with_source(
        kind,
        format!("Deleting {aggregate} {id} failed at {step}"),
        err,
    )
}
