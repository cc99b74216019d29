//! Group and membership entity models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::properties::Properties;

/// A named set of users inside one tenant.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Group {
    /// Unique group identifier.
    pub id: i64,
    /// Owning tenant.
    pub tenant_id: i64,
    /// Name, unique within the tenant.
    pub name: String,
    /// Implicit "all users of the tenant" group.
    pub is_all: bool,
    /// Extension properties.
    #[sqlx(json)]
    pub properties: Properties,
}

/// Row of the group/user join relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, FromRow)]
pub struct GroupUser {
    pub group_id: i64,
    pub user_id: i64,
}

/// Data required to create a new group.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateGroup {
    /// Owning tenant.
    pub tenant_id: i64,
    /// Name.
    pub name: String,
    /// Implicit "all users" flag.
    pub is_all: bool,
    /// Extension properties.
    pub properties: Properties,
}
