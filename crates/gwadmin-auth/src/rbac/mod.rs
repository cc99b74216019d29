//! Role hierarchy enforcement and the access guard.

pub mod enforcer;
pub mod guard;

pub use enforcer::RbacEnforcer;
pub use guard::AccessGuard;
