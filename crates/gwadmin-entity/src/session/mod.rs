//! Session and identity value objects.

pub mod identity;
pub mod model;

pub use identity::{Identity, SUPER_ADMIN_ID};
pub use model::{SessionPayload, SubjectKind};
