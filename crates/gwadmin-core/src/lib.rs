//! # gwadmin-core
//!
//! Core crate for the groupware administration backend. Contains the
//! unified error system, configuration schemas, and the capability traits
//! (such as the key-value cache) that the other crates implement.
//!
//! This crate has **no** internal dependencies on other gwadmin crates.

pub mod config;
pub mod error;
pub mod redact;
pub mod result;
pub mod traits;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
