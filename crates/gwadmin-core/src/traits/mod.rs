//! Capability traits defined in `gwadmin-core` and implemented by other crates.

pub mod cache;

pub use cache::CacheProvider;
