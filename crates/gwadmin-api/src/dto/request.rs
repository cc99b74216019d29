//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "PascalCase")]
pub struct LoginRequest {
    #[validate(custom(function = "not_blank", message = "Login is required"))]
    pub login: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    /// Ask for a persistent session.
    #[serde(default)]
    pub sign_me: bool,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Group membership request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddMemberRequest {
    pub user_id: i64,
}

/// Query of `DELETE /api/channels/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeleteChannelQuery {
    /// Also delete the channel's tenants.
    #[serde(default)]
    pub cascade: bool,
}
