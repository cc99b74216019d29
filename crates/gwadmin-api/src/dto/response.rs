//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use gwadmin_entity::session::Identity;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Login and refresh response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LoginResponse {
    pub auth_token: String,
}

/// Simple acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// The caller as seen by the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityResponse {
    pub user_id: Option<i64>,
    /// Wire role code, 0 = SuperAdmin.
    pub role: i32,
    pub role_name: String,
    pub tenant_id: Option<i64>,
    pub name: Option<String>,
    pub public_id: Option<String>,
    pub last_login: Option<DateTime<Utc>>,
}

impl From<&Identity> for IdentityResponse {
    fn from(identity: &Identity) -> Self {
        let user = identity.user();
        Self {
            user_id: identity.user_id(),
            role: identity.role().code(),
            role_name: identity.role().as_str().to_string(),
            tenant_id: identity.tenant_id(),
            name: user.map(|u| u.name.clone()),
            public_id: user.map(|u| u.public_id.clone()),
            last_login: user.and_then(|u| u.last_login),
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: String,
    pub cache: String,
}
