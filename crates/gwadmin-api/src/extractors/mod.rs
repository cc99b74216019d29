//! Custom Axum extractors.

pub mod auth;
pub mod client;

pub use auth::AuthToken;
pub use client::ClientInfo;
