//! # gwadmin-auth
//!
//! Authentication, session and tenant-scoped access control for gwadmin.
//!
//! ## Modules
//!
//! - `rbac`: role hierarchy checks and the access guard
//! - `directory`: identity and tenant lookups shared by every component
//! - `brute_force`: per-(login, address) lockout and address reputation
//! - `session`: opaque session tokens held in the cache
//! - `login`: credential verifiers and the login orchestrator
//! - `password`: Argon2id password hashing

pub mod brute_force;
pub mod directory;
pub mod login;
pub mod password;
pub mod rbac;
pub mod session;

pub use brute_force::BruteForceGuard;
pub use directory::Directory;
pub use login::{
    CredentialVerifier, LocalPasswordVerifier, LoginOrchestrator, LoginOutcome, LoginRequest,
    SuperAdminVerifier, Verification, VerifiedSubject, VerifierRegistry,
};
pub use password::PasswordHasher;
pub use rbac::{AccessGuard, RbacEnforcer};
pub use session::SessionTokenStore;
