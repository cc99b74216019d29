//! PostgreSQL repository implementations of the store traits.

pub mod channel;
pub mod group;
pub mod tenant;
pub mod user;
pub mod user_block;

pub use channel::ChannelRepository;
pub use group::GroupRepository;
pub use tenant::TenantRepository;
pub use user::UserRepository;
pub use user_block::UserBlockRepository;

/// Whether the error is a unique-constraint violation.
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}

/// Whether the error is a foreign-key violation.
pub(crate) fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation())
}
