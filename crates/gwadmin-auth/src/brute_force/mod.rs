//! Failed-login throttling per (login, source address) and per address.

pub mod guard;

pub use guard::BruteForceGuard;
