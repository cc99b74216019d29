//! HTTP handlers.

pub mod admin;
pub mod auth;
pub mod health;

use gwadmin_core::result::AppResult;
use gwadmin_entity::user::Role;
use gwadmin_service::RequestContext;

use crate::extractors::{AuthToken, ClientInfo};
use crate::state::AppState;

/// Run the access guard for `minimum` and build the request context.
pub(crate) async fn authorize(
    state: &AppState,
    token: &AuthToken,
    client: &ClientInfo,
    minimum: Role,
) -> AppResult<RequestContext> {
    let identity = state.access.require(token.as_deref(), minimum).await?;
    Ok(RequestContext::new(identity, client.ip.clone()))
}
