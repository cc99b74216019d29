//! Unified application error types for gwadmin.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator. Each [`ErrorKind`] carries a stable
//! numeric code that is what callers see on the wire.

use std::fmt;
use thiserror::Error;

/// Generic failure code used for every kind that must not leak detail.
pub const GENERIC_FAILURE_CODE: u16 = 500;

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// Credentials rejected, no verifier accepted them, tenant/web-domain
    /// mismatch, or a missing/expired token where authentication is required.
    AuthError,
    /// Brute-force lockout is active for the login or the source address.
    AccountBlocked,
    /// Authenticated, but the role or tenant scope is insufficient.
    AccessDenied,
    /// The request is malformed or misses required fields.
    InvalidInputParameter,
    /// A uniqueness constraint was violated.
    AlreadyExists,
    /// The referenced Channel/Tenant/User/Group does not exist.
    NotFound,
    /// An internal server error occurred.
    Internal,
    /// A database error occurred.
    Database,
    /// A cache error occurred.
    Cache,
    /// A configuration error occurred.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
}

impl ErrorKind {
    /// Stable numeric code of this kind.
    pub fn code(&self) -> u16 {
        match self {
            Self::AuthError => 101,
            Self::AccountBlocked => 102,
            Self::AccessDenied => 103,
            Self::InvalidInputParameter => 104,
            Self::AlreadyExists => 105,
            Self::NotFound => 106,
            Self::Internal
            | Self::Database
            | Self::Cache
            | Self::Configuration
            | Self::Serialization => GENERIC_FAILURE_CODE,
        }
    }

    /// Code reported to callers.
    ///
    /// `NotFound` collapses into the generic failure code so that callers
    /// cannot enumerate valid ids.
    pub fn public_code(&self) -> u16 {
        match self {
            Self::NotFound => GENERIC_FAILURE_CODE,
            other => other.code(),
        }
    }

    /// Whether the message of this kind may be shown to the caller verbatim.
    pub fn is_client_facing(&self) -> bool {
        self.public_code() != GENERIC_FAILURE_CODE
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AuthError => write!(f, "AUTH_ERROR"),
            Self::AccountBlocked => write!(f, "ACCOUNT_BLOCKED"),
            Self::AccessDenied => write!(f, "ACCESS_DENIED"),
            Self::InvalidInputParameter => write!(f, "INVALID_INPUT_PARAMETER"),
            Self::AlreadyExists => write!(f, "ALREADY_EXISTS"),
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Internal => write!(f, "INTERNAL"),
            Self::Database => write!(f, "DATABASE"),
            Self::Cache => write!(f, "CACHE"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Serialization => write!(f, "SERIALIZATION"),
        }
    }
}

/// The unified application error used throughout gwadmin.
///
/// All crate-specific errors are mapped into `AppError` using `From` impls
/// or explicit `.map_err()` calls. This provides a single error type for
/// the entire application boundary.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Remaining lockout, set only for [`ErrorKind::AccountBlocked`].
    pub retry_after_seconds: Option<u64>,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            retry_after_seconds: None,
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            retry_after_seconds: None,
            source: Some(Box::new(source)),
        }
    }

    /// Create an authentication error.
    pub fn auth(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::AuthError, message)
    }

    /// Create an account-blocked error carrying the remaining lockout.
    pub fn account_blocked(retry_after_seconds: u64) -> Self {
        Self {
            kind: ErrorKind::AccountBlocked,
            message: format!(
                "Too many failed login attempts, retry in {retry_after_seconds} seconds"
            ),
            retry_after_seconds: Some(retry_after_seconds),
            source: None,
        }
    }

    /// Create an access-denied error.
    pub fn access_denied(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::AccessDenied, message)
    }

    /// Create an invalid-input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidInputParameter, message)
    }

    /// Create a uniqueness-violation error.
    pub fn already_exists(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::AlreadyExists, message)
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Create a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Database, message)
    }

    /// Create a cache error.
    pub fn cache(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Cache, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Stable numeric code for this error.
    pub fn code(&self) -> u16 {
        self.kind.code()
    }

    /// Message safe to hand to the caller.
    pub fn public_message(&self) -> String {
        if self.kind.is_client_facing() {
            self.message.clone()
        } else {
            "Request failed".to_string()
        }
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            retry_after_seconds: self.retry_after_seconds,
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}
