//! Verifier for the configured SuperAdmin credential.

use async_trait::async_trait;
use tracing::error;

use gwadmin_core::config::SuperAdminConfig;
use gwadmin_core::result::AppResult;

use super::verifier::{CredentialVerifier, Verification, VerifiedSubject};
use crate::password::PasswordHasher;

/// Accepts the SuperAdmin login configured outside the tenant hierarchy.
///
/// The login is compared case-insensitively. With no login configured the
/// verifier declines everything.
#[derive(Debug, Clone)]
pub struct SuperAdminVerifier {
    config: SuperAdminConfig,
    hasher: PasswordHasher,
}

impl SuperAdminVerifier {
    pub fn new(config: SuperAdminConfig, hasher: PasswordHasher) -> Self {
        Self { config, hasher }
    }
}

#[async_trait]
impl CredentialVerifier for SuperAdminVerifier {
    fn name(&self) -> &'static str {
        "superadmin"
    }

    async fn verify(&self, login: &str, password: &str) -> AppResult<Verification> {
        if !self.config.is_configured() || !self.config.login.trim().eq_ignore_ascii_case(login) {
            return Ok(Verification::Declined);
        }

        match self.hasher.verify_password(password, &self.config.password_hash) {
            Ok(true) => Ok(Verification::Authenticated(VerifiedSubject::super_admin())),
            Ok(false) => Ok(Verification::Declined),
            Err(e) => {
                error!(error = %e, "Configured SuperAdmin password hash is unusable");
                Ok(Verification::Declined)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verifier() -> SuperAdminVerifier {
        let hasher = PasswordHasher::with_params(256, 1, 1).unwrap();
        let config = SuperAdminConfig {
            login: "root".to_string(),
            password_hash: hasher.hash_password("toor").unwrap(),
        };
        SuperAdminVerifier::new(config, hasher)
    }

    #[tokio::test]
    async fn test_accepts_configured_credential() {
        let v = verifier();
        assert_eq!(
            v.verify("ROOT", "toor").await.unwrap(),
            Verification::Authenticated(VerifiedSubject::super_admin())
        );
        assert_eq!(v.verify("root", "nope").await.unwrap(), Verification::Declined);
        assert_eq!(v.verify("admin", "toor").await.unwrap(), Verification::Declined);
    }

    #[tokio::test]
    async fn test_unconfigured_declines() {
        let v = SuperAdminVerifier::new(SuperAdminConfig::default(), PasswordHasher::new());
        assert_eq!(v.verify("", "").await.unwrap(), Verification::Declined);
    }
}
