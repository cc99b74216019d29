//! Role and tenant-scope checks.

use gwadmin_core::error::AppError;
use gwadmin_entity::session::Identity;
use gwadmin_entity::user::Role;

/// Stateless checks comparing a caller against a requirement.
#[derive(Debug, Clone, Copy, Default)]
pub struct RbacEnforcer;

impl RbacEnforcer {
    pub fn new() -> Self {
        Self
    }

    /// Fails with `AccessDenied` unless `actual` is at least `minimum`.
    pub fn require_minimum_role(&self, actual: Role, minimum: Role) -> Result<(), AppError> {
        if actual.at_least(minimum) {
            Ok(())
        } else {
            Err(AppError::access_denied(format!(
                "Role '{actual}' is insufficient; minimum required: '{minimum}'"
            )))
        }
    }

    /// Fails with `AccessDenied` unless the caller may act on a resource
    /// owned by `target_tenant_id`.
    ///
    /// The SuperAdmin bypasses tenant scoping. Anyone else must belong to
    /// the target's tenant; an unknown target (`None`) is denied so the
    /// caller cannot tell a foreign id from a missing one.
    pub fn require_tenant_scope(
        &self,
        identity: &Identity,
        target_tenant_id: Option<i64>,
    ) -> Result<(), AppError> {
        if identity.is_super_admin() {
            return Ok(());
        }
        match (identity.tenant_id(), target_tenant_id) {
            (Some(own), Some(target)) if own == target => Ok(()),
            _ => Err(AppError::access_denied("Resource is outside the caller's tenant")),
        }
    }

    /// Returns whether the identity bypasses tenant scoping.
    pub fn is_unscoped(&self, identity: &Identity) -> bool {
        identity.is_super_admin()
    }
}
