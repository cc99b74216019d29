//! Channel handlers.

use axum::Json;
use axum::extract::{Path, Query, State};

use gwadmin_entity::user::Role;

use crate::dto::request::DeleteChannelQuery;
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiResult;
use crate::extractors::{AuthToken, ClientInfo};
use crate::handlers::authorize;
use crate::state::AppState;

/// DELETE /api/channels/{id}?cascade=true
pub async fn delete_channel(
    State(state): State<AppState>,
    token: AuthToken,
    client: ClientInfo,
    Path(id): Path<i64>,
    Query(query): Query<DeleteChannelQuery>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    let ctx = authorize(&state, &token, &client, Role::SuperAdmin).await?;
    state.admin.delete_channel(&ctx, id, query.cascade).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Channel deleted"))))
}
