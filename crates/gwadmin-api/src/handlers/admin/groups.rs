//! Group membership handlers.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};

use gwadmin_core::error::AppError;
use gwadmin_entity::user::Role;

use crate::dto::request::AddMemberRequest;
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiResult;
use crate::extractors::{AuthToken, ClientInfo};
use crate::handlers::authorize;
use crate::state::AppState;

/// POST /api/groups/{id}/members
pub async fn add_member(
    State(state): State<AppState>,
    token: AuthToken,
    client: ClientInfo,
    Path(group_id): Path<i64>,
    body: Result<Json<AddMemberRequest>, JsonRejection>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    let Json(req) = body.map_err(|e| AppError::invalid_input(e.body_text()))?;
    let ctx = authorize(&state, &token, &client, Role::TenantAdmin).await?;
    state
        .admin
        .add_user_to_group(&ctx, group_id, req.user_id)
        .await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Member added"))))
}
