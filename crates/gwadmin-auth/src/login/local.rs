//! Verifier backed by the password hashes stored on user rows.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::error;

use gwadmin_core::result::AppResult;
use gwadmin_database::store::UserStore;

use super::verifier::{CredentialVerifier, Verification, VerifiedSubject};
use crate::password::PasswordHasher;

/// Accepts a login that names a stored user whose hash matches.
#[derive(Debug, Clone)]
pub struct LocalPasswordVerifier {
    users: Arc<dyn UserStore>,
    hasher: PasswordHasher,
}

impl LocalPasswordVerifier {
    pub fn new(users: Arc<dyn UserStore>, hasher: PasswordHasher) -> Self {
        Self { users, hasher }
    }
}

#[async_trait]
impl CredentialVerifier for LocalPasswordVerifier {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn verify(&self, login: &str, password: &str) -> AppResult<Verification> {
        let Some(user) = self.users.find_by_public_id(login).await? else {
            return Ok(Verification::Declined);
        };
        let Some(hash) = user.password_hash.as_deref() else {
            return Ok(Verification::Declined);
        };

        match self.hasher.verify_password(password, hash) {
            Ok(true) => Ok(Verification::Authenticated(VerifiedSubject::user(user.id))),
            Ok(false) => Ok(Verification::Declined),
            Err(e) => {
                // A corrupt hash locks this one account out, not everyone.
                error!(user_id = user.id, error = %e, "Stored password hash is unusable");
                Ok(Verification::Declined)
            }
        }
    }
}
