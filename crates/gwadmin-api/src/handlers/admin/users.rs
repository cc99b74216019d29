//! User handlers.

use axum::Json;
use axum::extract::{Path, State};

use gwadmin_entity::User;
use gwadmin_entity::user::Role;

use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiResult;
use crate::extractors::{AuthToken, ClientInfo};
use crate::handlers::authorize;
use crate::state::AppState;

/// GET /api/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    token: AuthToken,
    client: ClientInfo,
    Path(id): Path<i64>,
) -> ApiResult<Json<ApiResponse<User>>> {
    let ctx = authorize(&state, &token, &client, Role::TenantAdmin).await?;
    let user = state.admin.get_user(&ctx, id).await?;
    Ok(Json(ApiResponse::ok(user)))
}

/// DELETE /api/users/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    token: AuthToken,
    client: ClientInfo,
    Path(id): Path<i64>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    let ctx = authorize(&state, &token, &client, Role::TenantAdmin).await?;
    state.admin.delete_user(&ctx, id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("User deleted"))))
}
