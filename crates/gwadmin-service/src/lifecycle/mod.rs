//! Ordered, idempotent deletion across Channel → Tenant → Group → User →
//! session and block records.

pub mod coordinator;

pub use coordinator::LifecycleCoordinator;
