//! `AuthToken` extractor: finds the session token on a request.

use axum::extract::FromRequestParts;
use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::request::Parts;

use crate::error::ApiError;
use crate::state::AppState;

/// Header carrying the raw session token.
pub const AUTH_TOKEN_HEADER: &str = "authtoken";

/// The caller's session token, if any.
///
/// Looked up in the `AuthToken` header, then a `Bearer` Authorization
/// header, then the session cookie. Extraction never fails; an absent
/// token means an anonymous caller.
#[derive(Debug, Clone, Default)]
pub struct AuthToken(pub Option<String>);

impl AuthToken {
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl FromRequestParts<AppState> for AuthToken {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
        };

        if let Some(token) = header(AUTH_TOKEN_HEADER) {
            return Ok(Self(Some(token.to_string())));
        }

        if let Some(token) = header(AUTHORIZATION.as_str()).and_then(|v| v.strip_prefix("Bearer ")) {
            return Ok(Self(Some(token.trim().to_string())));
        }

        let cookie_name = state.config.session.cookie_name.as_str();
        let from_cookie = parts
            .headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|v| v.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, value)| *name == cookie_name && !value.is_empty())
            .map(|(_, value)| value.to_string());

        Ok(Self(from_cookie))
    }
}
