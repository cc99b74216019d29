//! Brute-force block entities.

pub mod model;

pub use model::UserBlock;
