//! Opaque session tokens.
//!
//! A token is a random capability string with no embedded identity. The
//! payload lives server-side in the cache under a digest of the token, so
//! revocation is immediate and total.

pub mod store;
pub mod token;

pub use store::SessionTokenStore;
