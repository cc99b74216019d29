//! Role hierarchy.

use serde::{Deserialize, Serialize};
use std::fmt;

use gwadmin_core::AppError;

/// Five privilege levels, from most to least privileged.
///
/// The integer codes are wire-stable: ascending code means decreasing
/// privilege.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(into = "i32", try_from = "i32")]
#[repr(i32)]
pub enum Role {
    /// The virtual system administrator.
    SuperAdmin = 0,
    /// Administrator of one tenant.
    TenantAdmin = 1,
    /// Regular tenant member.
    NormalUser = 2,
    /// Restricted external account.
    Customer = 3,
    /// Unauthenticated caller.
    Anonymous = 4,
}

impl Role {
    /// All roles in privilege order.
    pub const ALL: [Role; 5] = [
        Role::SuperAdmin,
        Role::TenantAdmin,
        Role::NormalUser,
        Role::Customer,
        Role::Anonymous,
    ];

    /// Wire code of this role.
    pub fn code(self) -> i32 {
        self as i32
    }

    /// True iff this role satisfies `required` (lower code = more privilege).
    pub fn at_least(self, required: Role) -> bool {
        self.code() <= required.code()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SuperAdmin => "super_admin",
            Self::TenantAdmin => "tenant_admin",
            Self::NormalUser => "normal_user",
            Self::Customer => "customer",
            Self::Anonymous => "anonymous",
        }
    }
}

impl From<Role> for i32 {
    fn from(role: Role) -> Self {
        role.code()
    }
}

impl TryFrom<i32> for Role {
    type Error = AppError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        Role::ALL
            .into_iter()
            .find(|r| r.code() == code)
            .ok_or_else(|| AppError::invalid_input(format!("Invalid role code: {code}")))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
