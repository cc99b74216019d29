//! Pluggable credential verification.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use gwadmin_core::result::AppResult;
use gwadmin_entity::session::{SUPER_ADMIN_ID, SubjectKind};

/// Subject a verifier vouches for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifiedSubject {
    pub kind: SubjectKind,
    pub user_id: i64,
}

impl VerifiedSubject {
    pub fn user(user_id: i64) -> Self {
        Self {
            kind: SubjectKind::User,
            user_id,
        }
    }

    pub fn super_admin() -> Self {
        Self {
            kind: SubjectKind::SuperAdmin,
            user_id: SUPER_ADMIN_ID,
        }
    }
}

/// Answer of one verifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    Authenticated(VerifiedSubject),
    /// Not this verifier's credential, or a wrong password.
    Declined,
}

/// A source of truth for credentials (local password store, SSO, ...).
///
/// A verifier declines anything it does not recognise. Errors are reserved
/// for infrastructure failures and abort the login attempt.
#[async_trait]
pub trait CredentialVerifier: Send + Sync + fmt::Debug {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    async fn verify(&self, login: &str, password: &str) -> AppResult<Verification>;
}

/// Verifiers in registration order.
#[derive(Debug, Clone, Default)]
pub struct VerifierRegistry {
    verifiers: Vec<Arc<dyn CredentialVerifier>>,
}

impl VerifierRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, verifier: Arc<dyn CredentialVerifier>) -> &mut Self {
        self.verifiers.push(verifier);
        self
    }

    pub fn with(mut self, verifier: Arc<dyn CredentialVerifier>) -> Self {
        self.register(verifier);
        self
    }

    pub fn len(&self) -> usize {
        self.verifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.verifiers.is_empty()
    }

    /// Ask each verifier in turn; the first affirmative answer wins and the
    /// rest are not consulted.
    pub async fn verify(&self, login: &str, password: &str) -> AppResult<Option<VerifiedSubject>> {
        for verifier in &self.verifiers {
            if let Verification::Authenticated(subject) = verifier.verify(login, password).await? {
                debug!(verifier = verifier.name(), user_id = subject.user_id, "Credential accepted");
                return Ok(Some(subject));
            }
        }
        Ok(None)
    }
}
