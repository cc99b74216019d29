//! # gwadmin-service
//!
//! Business operations behind the access guard. Services follow constructor
//! injection: all dependencies are provided at construction time and the
//! caller's resolved identity arrives as a [`RequestContext`].

pub mod admin;
pub mod context;
pub mod lifecycle;

pub use admin::AdminService;
pub use context::RequestContext;
pub use lifecycle::LifecycleCoordinator;
