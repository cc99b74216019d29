//! Maps domain `AppError` to HTTP responses.
//!
//! Handlers return [`ApiResult`]; the `?` operator lifts any `AppError`
//! into [`ApiError`], which renders the stable code and message.

use axum::Json;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use gwadmin_core::error::{AppError, ErrorKind};

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorResponse {
    /// Stable numeric error code.
    pub code: u16,
    /// Human-readable message.
    pub message: String,
    /// Remaining lockout for `AccountBlocked`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after_seconds: Option<u64>,
}

/// HTTP-facing wrapper around [`AppError`].
#[derive(Debug)]
pub struct ApiError(pub AppError);

/// Result type returned by handlers and extractors.
pub type ApiResult<T> = Result<T, ApiError>;

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

fn status_of(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::AuthError => StatusCode::UNAUTHORIZED,
        ErrorKind::AccountBlocked => StatusCode::TOO_MANY_REQUESTS,
        ErrorKind::AccessDenied => StatusCode::FORBIDDEN,
        ErrorKind::InvalidInputParameter => StatusCode::BAD_REQUEST,
        ErrorKind::AlreadyExists => StatusCode::CONFLICT,
        // Indistinguishable from any other failure.
        ErrorKind::NotFound
        | ErrorKind::Internal
        | ErrorKind::Database
        | ErrorKind::Cache
        | ErrorKind::Configuration
        | ErrorKind::Serialization => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let Self(err) = self;
        match err.kind {
            ErrorKind::NotFound => tracing::debug!(error = %err, "Lookup miss surfaced"),
            kind if !kind.is_client_facing() => {
                tracing::error!(error = %err, source = ?err.source, "Request failed");
            }
            _ => {}
        }

        let body = ApiErrorResponse {
            code: err.kind.public_code(),
            message: err.public_message(),
            retry_after_seconds: err.retry_after_seconds,
        };

        let mut response = (status_of(err.kind), Json(body)).into_response();
        if let Some(secs) = err.retry_after_seconds {
            if let Ok(value) = HeaderValue::from_str(&secs.to_string()) {
                response.headers_mut().insert(header::RETRY_AFTER, value);
            }
        }
        response
    }
}
