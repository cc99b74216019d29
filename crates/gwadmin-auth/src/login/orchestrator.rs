//! Login orchestration.
//!
//! One attempt runs through: block check, credential verification, block
//! bookkeeping, account and tenant checks, token issuance. A blocked
//! caller never reaches the verifiers.

use chrono::Utc;
use tracing::{info, warn};

use gwadmin_core::error::AppError;
use gwadmin_core::result::AppResult;
use gwadmin_entity::session::{SessionPayload, SubjectKind};

use super::verifier::{VerifiedSubject, VerifierRegistry};
use crate::brute_force::BruteForceGuard;
use crate::directory::Directory;

/// One login attempt as received from the transport.
#[derive(Debug, Clone)]
pub struct LoginRequest {
    pub login: String,
    pub password: String,
    /// Whether the caller asked for a persistent session.
    pub sign_me: bool,
    /// Address the attempt came from.
    pub source_ip: String,
    /// Host the request was addressed to.
    pub web_domain: Option<String>,
}

/// A successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    /// Opaque session token for the caller.
    pub token: String,
    pub payload: SessionPayload,
}

/// Turns credentials into a session or a typed failure.
#[derive(Debug, Clone)]
pub struct LoginOrchestrator {
    guard: BruteForceGuard,
    directory: Directory,
    verifiers: VerifierRegistry,
    multi_tenant: bool,
    persistent_days: u64,
}

impl LoginOrchestrator {
    pub fn new(
        guard: BruteForceGuard,
        directory: Directory,
        verifiers: VerifierRegistry,
        multi_tenant: bool,
        persistent_days: u64,
    ) -> Self {
        Self {
            guard,
            directory,
            verifiers,
            multi_tenant,
            persistent_days,
        }
    }

    /// Authenticate and issue a session token.
    ///
    /// Fails with `InvalidInputParameter` for a blank login, with
    /// `AccountBlocked` while the (login, address) pair or the whole
    /// address is locked out, and with `AuthError` for every other
    /// rejection.
    pub async fn authenticate(&self, request: &LoginRequest) -> AppResult<LoginOutcome> {
        let login = request.login.trim();
        let ip = request.source_ip.as_str();
        if login.is_empty() {
            return Err(AppError::invalid_input("Login is required"));
        }

        self.guard.is_blocked(login, ip).await?;
        self.guard.check_ip_reputation(ip).await?;

        let Some(subject) = self.verifiers.verify(login, &request.password).await? else {
            self.guard.record_failure(login, ip).await?;
            // Report a lockout reached by this very attempt.
            self.guard.is_blocked(login, ip).await?;
            warn!(login, ip, "Login rejected");
            return Err(AppError::auth("Invalid login or password"));
        };

        self.guard.record_success(login, ip).await?;

        if subject.kind == SubjectKind::User {
            self.admit_user(subject, request.web_domain.as_deref())
                .await?;
        }

        let payload = SessionPayload::new(
            subject.kind,
            subject.user_id,
            request.sign_me,
            self.persistent_days,
        );
        let token = self
            .directory
            .sessions()
            .issue(&payload, request.sign_me)
            .await?;

        info!(
            user_id = subject.user_id,
            kind = ?subject.kind,
            sign_me = request.sign_me,
            "Login succeeded"
        );
        Ok(LoginOutcome { token, payload })
    }

    /// Account, tenant and web-domain checks for a verified stored user,
    /// then login bookkeeping.
    async fn admit_user(&self, subject: VerifiedSubject, web_domain: Option<&str>) -> AppResult<()> {
        let user = self
            .directory
            .resolve_user_by_id(subject.user_id)
            .await?
            .filter(|u| u.can_login())
            .ok_or_else(|| {
                warn!(user_id = subject.user_id, "Login refused for missing or disabled user");
                AppError::auth("Invalid login or password")
            })?;

        let tenant = self
            .directory
            .resolve_tenant_by_id(user.tenant_id)
            .await?
            .filter(|t| !t.is_disabled)
            .ok_or_else(|| {
                warn!(
                    user_id = user.id,
                    tenant_id = user.tenant_id,
                    "Login refused for missing or disabled tenant"
                );
                AppError::auth("Invalid login or password")
            })?;

        if self.multi_tenant {
            let request_tenant = self.directory.tenant_for_request_domain(web_domain).await?;
            if request_tenant.as_ref().map(|t| t.id) != Some(tenant.id) {
                warn!(
                    user_id = user.id,
                    user_tenant = tenant.id,
                    request_tenant = ?request_tenant.map(|t| t.id),
                    web_domain = ?web_domain,
                    "Login refused: tenant does not serve this domain"
                );
                return Err(AppError::auth("Invalid login or password"));
            }
        }

        self.directory
            .stores()
            .users
            .record_login(user.id, Utc::now())
            .await
    }
}
