//! # gwadmin-entity
//!
//! Domain entity models for the groupware admin backend. Every struct in
//! this crate represents a database table row or a domain value object.
//! Database entities additionally derive `sqlx::FromRow`.
//!
//! The hierarchy is Channel → Tenant → User/Group. Sessions are not rows;
//! they live in the cache as [`session::SessionPayload`] values.

pub mod block;
pub mod channel;
pub mod group;
pub mod properties;
pub mod session;
pub mod tenant;
pub mod user;

pub use block::UserBlock;
pub use channel::Channel;
pub use group::{Group, GroupUser};
pub use properties::Properties;
pub use session::{Identity, SessionPayload, SubjectKind};
pub use tenant::Tenant;
pub use user::{Role, User};
