//! Administrative reads, deletes and group membership, each behind a role
//! requirement and a tenant-scope check.

use tracing::info;

use gwadmin_auth::{Directory, RbacEnforcer};
use gwadmin_core::error::AppError;
use gwadmin_core::result::AppResult;
use gwadmin_entity::user::Role;
use gwadmin_entity::{Tenant, User};

use crate::context::RequestContext;
use crate::lifecycle::LifecycleCoordinator;

/// Admin operations on tenants, users, groups and channels.
#[derive(Debug, Clone)]
pub struct AdminService {
    directory: Directory,
    lifecycle: LifecycleCoordinator,
    rbac: RbacEnforcer,
}

impl AdminService {
    pub fn new(directory: Directory, lifecycle: LifecycleCoordinator) -> Self {
        Self {
            directory,
            lifecycle,
            rbac: RbacEnforcer::new(),
        }
    }

    /// Gets a tenant. TenantAdmins only see their own.
    pub async fn get_tenant(&self, ctx: &RequestContext, id: i64) -> AppResult<Tenant> {
        self.rbac.require_minimum_role(ctx.role(), Role::TenantAdmin)?;

        let tenant = self.directory.resolve_tenant_by_id(id).await?;
        self.rbac
            .require_tenant_scope(&ctx.identity, tenant.as_ref().map(|t| t.id))?;
        tenant.ok_or_else(|| AppError::not_found(format!("Tenant {id} not found")))
    }

    /// Gets a user of the caller's tenant.
    pub async fn get_user(&self, ctx: &RequestContext, id: i64) -> AppResult<User> {
        self.rbac.require_minimum_role(ctx.role(), Role::TenantAdmin)?;

        let user = self.directory.resolve_user_by_id(id).await?;
        self.rbac
            .require_tenant_scope(&ctx.identity, user.as_ref().map(|u| u.tenant_id))?;
        user.ok_or_else(|| AppError::not_found(format!("User {id} not found")))
    }

    /// Deletes a user of the caller's tenant with its sessions and blocks.
    ///
    /// A SuperAdmin deleting an absent user succeeds; anyone else is denied
    /// because the id cannot be placed in their tenant.
    pub async fn delete_user(&self, ctx: &RequestContext, id: i64) -> AppResult<()> {
        self.rbac.require_minimum_role(ctx.role(), Role::TenantAdmin)?;

        let user = self.directory.resolve_user_by_id(id).await?;
        self.rbac
            .require_tenant_scope(&ctx.identity, user.as_ref().map(|u| u.tenant_id))?;

        self.lifecycle.delete_user(id).await?;
        info!(actor = ?ctx.user_id(), user_id = id, "User deleted by admin");
        Ok(())
    }

    /// Deletes a tenant with all its groups and users. SuperAdmin only.
    pub async fn delete_tenant(&self, ctx: &RequestContext, id: i64) -> AppResult<()> {
        self.rbac.require_minimum_role(ctx.role(), Role::SuperAdmin)?;
        self.lifecycle.delete_tenant(id).await
    }

    /// Deletes a channel, cascading into its tenants on request.
    /// SuperAdmin only.
    pub async fn delete_channel(&self, ctx: &RequestContext, id: i64, cascade: bool) -> AppResult<()> {
        self.rbac.require_minimum_role(ctx.role(), Role::SuperAdmin)?;
        self.lifecycle.delete_channel(id, cascade).await
    }

    /// Adds a user to a group of the same tenant.
    ///
    /// The caller must be in scope for the group, and the user must belong
    /// to the group's tenant; a cross-tenant membership is `AccessDenied`.
    pub async fn add_user_to_group(
        &self,
        ctx: &RequestContext,
        group_id: i64,
        user_id: i64,
    ) -> AppResult<()> {
        self.rbac.require_minimum_role(ctx.role(), Role::TenantAdmin)?;

        let group = self.directory.resolve_group_by_id(group_id).await?;
        self.rbac
            .require_tenant_scope(&ctx.identity, group.as_ref().map(|g| g.tenant_id))?;
        let group = group.ok_or_else(|| AppError::not_found(format!("Group {group_id} not found")))?;

        let user = self.directory.resolve_user_by_id(user_id).await?;
        match user {
            Some(user) if user.tenant_id == group.tenant_id => {}
            Some(_) => {
                return Err(AppError::access_denied(
                    "User and group belong to different tenants",
                ));
            }
            None if ctx.is_super_admin() => {
                return Err(AppError::not_found(format!("User {user_id} not found")));
            }
            None => {
                return Err(AppError::access_denied("User is outside the caller's tenant"));
            }
        }

        self.directory
            .stores()
            .groups
            .add_member(group_id, user_id)
            .await?;
        info!(actor = ?ctx.user_id(), group_id, user_id, "User added to group");
        Ok(())
    }
}
