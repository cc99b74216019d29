//! Auth handlers: login, logout, refresh, me.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::header::SET_COOKIE;
use axum::http::{HeaderMap, HeaderValue};
use validator::Validate;

use gwadmin_auth::LoginRequest as Credentials;
use gwadmin_core::error::AppError;
use gwadmin_entity::user::Role;

use super::authorize;
use crate::dto::request::LoginRequest;
use crate::dto::response::{ApiResponse, IdentityResponse, LoginResponse, MessageResponse};
use crate::error::ApiResult;
use crate::extractors::{AuthToken, ClientInfo};
use crate::state::AppState;

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    client: ClientInfo,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<(HeaderMap, Json<ApiResponse<LoginResponse>>)> {
    let Json(req) = body.map_err(|e| AppError::invalid_input(e.body_text()))?;
    req.validate()
        .map_err(|e| AppError::invalid_input(e.to_string()))?;

    let sign_me = req.sign_me;
    let outcome = state
        .login
        .authenticate(&Credentials {
            login: req.login,
            password: req.password,
            sign_me,
            source_ip: client.ip,
            web_domain: client.host,
        })
        .await?;

    let max_age = sign_me.then(|| state.directory.sessions().persistent_ttl().as_secs());
    let headers = session_cookie(&state, &outcome.token, max_age);

    Ok((
        headers,
        Json(ApiResponse::ok(LoginResponse {
            auth_token: outcome.token,
        })),
    ))
}

/// POST /api/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    token: AuthToken,
) -> ApiResult<(HeaderMap, Json<ApiResponse<MessageResponse>>)> {
    if let Some(token) = token.as_deref() {
        state.directory.sessions().revoke(token).await?;
    }
    let headers = session_cookie(&state, "", Some(0));
    Ok((headers, Json(ApiResponse::ok(MessageResponse::new("Logged out")))))
}

/// POST /api/auth/refresh
pub async fn refresh(
    State(state): State<AppState>,
    token: AuthToken,
) -> ApiResult<(HeaderMap, Json<ApiResponse<LoginResponse>>)> {
    let token = token
        .as_deref()
        .ok_or_else(|| AppError::auth("Authentication required"))?;

    let (new_token, payload) = state
        .directory
        .sessions()
        .refresh(token, state.config.session.persistent_days)
        .await?;

    let max_age = payload
        .sign_me
        .then(|| state.directory.sessions().persistent_ttl().as_secs());
    let headers = session_cookie(&state, &new_token, max_age);

    Ok((
        headers,
        Json(ApiResponse::ok(LoginResponse {
            auth_token: new_token,
        })),
    ))
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    token: AuthToken,
    client: ClientInfo,
) -> ApiResult<Json<ApiResponse<IdentityResponse>>> {
    let ctx = authorize(&state, &token, &client, Role::Customer).await?;
    Ok(Json(ApiResponse::ok(IdentityResponse::from(&ctx.identity))))
}

/// `Set-Cookie` for the session token. A `None` max-age makes a browser
/// session cookie.
fn session_cookie(state: &AppState, token: &str, max_age: Option<u64>) -> HeaderMap {
    let mut cookie = format!(
        "{}={token}; Path=/; HttpOnly; SameSite=Lax",
        state.config.session.cookie_name
    );
    if let Some(secs) = max_age {
        cookie.push_str(&format!("; Max-Age={secs}"));
    }

    let mut headers = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_str(&cookie) {
        headers.insert(SET_COOKIE, value);
    }
    headers
}
