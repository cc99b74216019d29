//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::role::Role;
use crate::properties::Properties;

/// A persisted account belonging to exactly one tenant.
///
/// The SuperAdmin is never a row of this table; see
/// [`Identity`](crate::session::Identity).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: i64,
    /// Stable external identifier.
    pub uuid: Uuid,
    /// Display name.
    pub name: String,
    /// Unique login, typically an email address.
    pub public_id: String,
    /// Argon2 password hash, absent for accounts without a local password.
    #[serde(skip_serializing, default)]
    pub password_hash: Option<String>,
    /// Owning tenant.
    pub tenant_id: i64,
    /// Disabled users cannot log in.
    pub is_disabled: bool,
    /// Privilege level.
    pub role: Role,
    /// Last successful login.
    pub last_login: Option<DateTime<Utc>>,
    /// Number of successful logins.
    pub logins_count: i64,
    pub language: String,
    pub time_format: String,
    pub date_format: String,
    /// Whether the user's activity goes to a dedicated log.
    pub write_separate_log: bool,
    /// Administrator note.
    pub note: String,
    /// Extension properties.
    #[sqlx(json)]
    pub properties: Properties,
}

impl User {
    /// Whether the user may be authenticated at all.
    pub fn can_login(&self) -> bool {
        !self.is_disabled
    }
}

/// Data required to create a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Display name.
    pub name: String,
    /// Unique login.
    pub public_id: String,
    /// Pre-hashed password.
    pub password_hash: Option<String>,
    /// Owning tenant.
    pub tenant_id: i64,
    /// Assigned role. `SuperAdmin` is rejected by the stores.
    pub role: Role,
    pub language: String,
    pub time_format: String,
    pub date_format: String,
}

impl CreateUser {
    /// A user with default preferences.
    pub fn new(
        name: impl Into<String>,
        public_id: impl Into<String>,
        tenant_id: i64,
        role: Role,
    ) -> Self {
        Self {
            name: name.into(),
            public_id: public_id.into(),
            password_hash: None,
            tenant_id,
            role,
            language: "en".to_string(),
            time_format: "HH:mm".to_string(),
            date_format: "yyyy-MM-dd".to_string(),
        }
    }

    /// Attach a pre-hashed password.
    pub fn with_password_hash(mut self, hash: impl Into<String>) -> Self {
        self.password_hash = Some(hash.into());
        self
    }
}
