//! # gwadmin-cache
//!
//! Key-value cache providers for gwadmin. Two modes are supported:
//!
//! - **memory**: in-process cache using [moka](https://crates.io/crates/moka)
//!   with per-entry expiry
//! - **redis**: shared cache using the [redis](https://crates.io/crates/redis) crate
//!
//! The provider is selected at runtime from configuration. Session tokens
//! and memoised tenant lookups both live here.

pub mod keys;
#[cfg(feature = "memory")]
pub mod memory;
pub mod provider;
#[cfg(feature = "redis-backend")]
pub mod redis;

pub use provider::CacheManager;
