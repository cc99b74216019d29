//! Login: credential verifiers and the orchestrator that turns a verified
//! credential into a session.

pub mod local;
pub mod orchestrator;
pub mod super_admin;
pub mod verifier;

pub use local::LocalPasswordVerifier;
pub use orchestrator::{LoginOrchestrator, LoginOutcome, LoginRequest};
pub use super_admin::SuperAdminVerifier;
pub use verifier::{CredentialVerifier, Verification, VerifiedSubject, VerifierRegistry};
