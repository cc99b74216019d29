//! # gwadmin-database
//!
//! Storage for channels, tenants, users, groups and brute-force block
//! rows. Each aggregate has a store trait in [`store`] with two
//! implementations: PostgreSQL repositories in [`repositories`] and the
//! in-process [`memory::MemoryDatabase`] used by tests and by the
//! database-less development mode.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use memory::MemoryDatabase;
pub use store::{ChannelStore, GroupStore, Stores, TenantStore, UserBlockStore, UserStore};
