//! Tenant-scoped administrative operations.

pub mod service;

pub use service::AdminService;
