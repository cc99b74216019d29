//! Access guard placed in front of every privileged operation.

use tracing::warn;

use gwadmin_core::error::AppError;
use gwadmin_core::result::AppResult;
use gwadmin_entity::session::Identity;
use gwadmin_entity::user::Role;

use super::enforcer::RbacEnforcer;
use crate::directory::Directory;

/// Resolves a token into an identity and checks role and tenant scope.
#[derive(Debug, Clone)]
pub struct AccessGuard {
    directory: Directory,
    enforcer: RbacEnforcer,
}

impl AccessGuard {
    pub fn new(directory: Directory) -> Self {
        Self {
            directory,
            enforcer: RbacEnforcer::new(),
        }
    }

    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    /// Identity behind an optional token. Anything that does not resolve is
    /// `Anonymous`.
    pub async fn identify(&self, token: Option<&str>) -> AppResult<Identity> {
        let Some(token) = token.filter(|t| !t.is_empty()) else {
            return Ok(Identity::Anonymous);
        };
        Ok(self
            .directory
            .resolve_user_by_token(token)
            .await?
            .unwrap_or(Identity::Anonymous))
    }

    /// Authenticate the caller and require at least `minimum`.
    ///
    /// An anonymous caller facing a non-anonymous requirement gets
    /// `AuthError`; an authenticated caller with too little privilege gets
    /// `AccessDenied`.
    pub async fn require(&self, token: Option<&str>, minimum: Role) -> AppResult<Identity> {
        let identity = self.identify(token).await?;

        if identity.is_anonymous() && minimum != Role::Anonymous {
            return Err(AppError::auth("Authentication required"));
        }

        if let Err(e) = self.enforcer.require_minimum_role(identity.role(), minimum) {
            warn!(
                user_id = ?identity.user_id(),
                role = %identity.role(),
                required = %minimum,
                "Access denied by role"
            );
            return Err(e);
        }

        Ok(identity)
    }

    /// Check that `identity` may touch a resource of `target_tenant_id`.
    pub fn require_tenant_scope(
        &self,
        identity: &Identity,
        target_tenant_id: Option<i64>,
    ) -> AppResult<()> {
        self.enforcer
            .require_tenant_scope(identity, target_tenant_id)
            .inspect_err(|_| {
                warn!(
                    user_id = ?identity.user_id(),
                    caller_tenant = ?identity.tenant_id(),
                    target_tenant = ?target_tenant_id,
                    "Access denied by tenant scope"
                );
            })
    }

    /// `require` followed by a tenant-scope check against the target.
    pub async fn require_scoped(
        &self,
        token: Option<&str>,
        minimum: Role,
        target_tenant_id: Option<i64>,
    ) -> AppResult<Identity> {
        let identity = self.require(token, minimum).await?;
        self.require_tenant_scope(&identity, target_tenant_id)?;
        Ok(identity)
    }
}
