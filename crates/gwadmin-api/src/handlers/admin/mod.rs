//! Tenant-scoped admin handlers.

pub mod channels;
pub mod groups;
pub mod tenants;
pub mod users;
