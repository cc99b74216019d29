//! Resolved caller identity.

use crate::user::{Role, User};

/// Conventional id of the virtual SuperAdmin.
pub const SUPER_ADMIN_ID: i64 = -1;

/// Who is making a request.
///
/// The SuperAdmin is synthesized here and never loaded from storage.
#[derive(Debug, Clone)]
pub enum Identity {
    /// The configured system administrator.
    SuperAdmin,
    /// A persisted, enabled user.
    Regular(User),
    /// No valid session.
    Anonymous,
}

impl Identity {
    pub fn role(&self) -> Role {
        match self {
            Self::SuperAdmin => Role::SuperAdmin,
            Self::Regular(user) => user.role,
            Self::Anonymous => Role::Anonymous,
        }
    }

    /// User id, the sentinel id for SuperAdmin, `None` when anonymous.
    pub fn user_id(&self) -> Option<i64> {
        match self {
            Self::SuperAdmin => Some(SUPER_ADMIN_ID),
            Self::Regular(user) => Some(user.id),
            Self::Anonymous => None,
        }
    }

    /// Tenant of the caller. SuperAdmin and anonymous callers have none.
    pub fn tenant_id(&self) -> Option<i64> {
        match self {
            Self::Regular(user) => Some(user.tenant_id),
            _ => None,
        }
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            Self::Regular(user) => Some(user),
            _ => None,
        }
    }

    pub fn is_super_admin(&self) -> bool {
        matches!(self, Self::SuperAdmin)
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self, Self::Anonymous)
    }
}
