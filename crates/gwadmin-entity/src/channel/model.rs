//! Channel entity model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Top-level grouping that owns zero or more tenants.
///
/// The login/secret pair is system generated and is not an end-user
/// login method.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Channel {
    /// Unique channel identifier.
    pub id: i64,
    /// Unique identifier-style login.
    pub login: String,
    /// System-generated secret.
    #[serde(skip_serializing, default)]
    pub password: String,
    /// Free-form description.
    pub description: String,
}

/// Data required to create a new channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateChannel {
    /// Unique login.
    pub login: String,
    /// Generated secret.
    pub password: String,
    /// Description.
    pub description: String,
}
