//! Tenant handlers.

use axum::Json;
use axum::extract::{Path, State};

use gwadmin_entity::Tenant;
use gwadmin_entity::user::Role;

use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiResult;
use crate::extractors::{AuthToken, ClientInfo};
use crate::handlers::authorize;
use crate::state::AppState;

/// GET /api/tenants/{id}
pub async fn get_tenant(
    State(state): State<AppState>,
    token: AuthToken,
    client: ClientInfo,
    Path(id): Path<i64>,
) -> ApiResult<Json<ApiResponse<Tenant>>> {
    let ctx = authorize(&state, &token, &client, Role::TenantAdmin).await?;
    let tenant = state.admin.get_tenant(&ctx, id).await?;
    Ok(Json(ApiResponse::ok(tenant)))
}

/// DELETE /api/tenants/{id}
pub async fn delete_tenant(
    State(state): State<AppState>,
    token: AuthToken,
    client: ClientInfo,
    Path(id): Path<i64>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    let ctx = authorize(&state, &token, &client, Role::SuperAdmin).await?;
    state.admin.delete_tenant(&ctx, id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Tenant deleted"))))
}
