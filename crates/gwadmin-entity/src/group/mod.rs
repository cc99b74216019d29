//! Group domain entities.

pub mod model;

pub use model::{CreateGroup, Group, GroupUser};
