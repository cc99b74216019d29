//! # gwadmin-api
//!
//! Thin JSON-over-HTTP layer for gwadmin built on Axum.
//!
//! Handlers extract the session token and client details, hand them to the
//! access guard and services, and map [`AppError`](gwadmin_core::AppError)
//! through [`ApiError`] to a stable numeric code in the response body.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::serve;
pub use error::{ApiError, ApiResult};
pub use router::build_router;
pub use state::AppState;
