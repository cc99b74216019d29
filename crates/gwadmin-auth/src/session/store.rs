//! Session/token store backed by the key-value cache.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info, warn};

use gwadmin_cache::keys;
use gwadmin_core::config::SessionConfig;
use gwadmin_core::error::AppError;
use gwadmin_core::result::AppResult;
use gwadmin_core::traits::cache::CacheProvider;
use gwadmin_entity::session::{SessionPayload, SubjectKind};

use super::token::{digest_token, generate_token};

/// Issues, validates and revokes opaque session tokens.
///
/// Each token owns two cache entries: the payload under
/// `session:{digest}` and an ownership marker under
/// `session:owner:{subject}:{digest}`. A token is valid only while both
/// exist, so deleting a subject's markers revokes all of its sessions.
#[derive(Debug, Clone)]
pub struct SessionTokenStore {
    cache: Arc<dyn CacheProvider>,
    persistent_ttl: Duration,
}

impl SessionTokenStore {
    pub fn new(cache: Arc<dyn CacheProvider>, config: &SessionConfig) -> Self {
        Self {
            cache,
            persistent_ttl: Duration::from_secs(config.persistent_days * 24 * 60 * 60),
        }
    }

    /// Lifetime of persistent sessions.
    pub fn persistent_ttl(&self) -> Duration {
        self.persistent_ttl
    }

    /// Store `payload` under a fresh token and return the token.
    ///
    /// Persistent tokens expire after the configured number of days; others
    /// carry no TTL and live until revoked.
    pub async fn issue(&self, payload: &SessionPayload, persistent: bool) -> AppResult<String> {
        let token = generate_token();
        let digest = digest_token(&token);
        let ttl = persistent.then_some(self.persistent_ttl);
        let body = serde_json::to_string(payload)?;
        let subject = subject_of(payload);

        self.cache.set(&keys::session(&digest), &body, ttl).await?;
        self.cache
            .set(&keys::session_owner(&subject, &digest), "1", ttl)
            .await?;

        debug!(subject = %subject, persistent, "Session token issued");
        Ok(token)
    }

    /// Resolve a token to its payload. Missing, expired, revoked or
    /// corrupt entries all yield `None`.
    pub async fn validate(&self, token: &str) -> AppResult<Option<SessionPayload>> {
        let digest = digest_token(token);
        let Some(body) = self.cache.get(&keys::session(&digest)).await? else {
            return Ok(None);
        };

        let payload: SessionPayload = match serde_json::from_str(&body) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(error = %e, "Discarding unreadable session payload");
                self.cache.delete(&keys::session(&digest)).await?;
                return Ok(None);
            }
        };

        let owner_key = keys::session_owner(&subject_of(&payload), &digest);
        if !self.cache.exists(&owner_key).await? {
            // Revoked through revoke_all_for_user.
            self.cache.delete(&keys::session(&digest)).await?;
            return Ok(None);
        }

        if payload.is_expired(Utc::now()) {
            self.remove(&payload, &digest).await?;
            return Ok(None);
        }

        Ok(Some(payload))
    }

    /// Delete a token. Revoking an unknown token is a no-op.
    pub async fn revoke(&self, token: &str) -> AppResult<()> {
        let digest = digest_token(token);
        if let Some(body) = self.cache.get(&keys::session(&digest)).await? {
            if let Ok(payload) = serde_json::from_str::<SessionPayload>(&body) {
                self.remove(&payload, &digest).await?;
                info!(subject = %subject_of(&payload), "Session revoked");
                return Ok(());
            }
        }
        self.cache.delete(&keys::session(&digest)).await
    }

    /// Replace a valid token with a new one carrying the same subject and
    /// persistence. The old token stops working immediately.
    pub async fn refresh(&self, token: &str, persistent_days: u64) -> AppResult<(String, SessionPayload)> {
        let current = self
            .validate(token)
            .await?
            .ok_or_else(|| AppError::auth("Session expired or invalid"))?;

        self.revoke(token).await?;

        let payload = SessionPayload::new(
            current.subject_kind,
            current.user_id,
            current.sign_me,
            persistent_days,
        );
        let new_token = self.issue(&payload, payload.sign_me).await?;
        Ok((new_token, payload))
    }

    /// Revoke every session of a stored user.
    pub async fn revoke_all_for_user(&self, user_id: i64) -> AppResult<u64> {
        self.revoke_all(&keys::session_subject(Some(user_id))).await
    }

    /// Revoke every session of the virtual SuperAdmin.
    pub async fn revoke_all_for_super_admin(&self) -> AppResult<u64> {
        self.revoke_all(&keys::session_subject(None)).await
    }

    async fn revoke_all(&self, subject: &str) -> AppResult<u64> {
        let markers = self
            .cache
            .keys_matching(&keys::session_owner_pattern(subject))
            .await?;

        for marker in &markers {
            if let Some(digest) = marker.rsplit(':').next() {
                self.cache.delete(&keys::session(digest)).await?;
            }
            self.cache.delete(marker).await?;
        }

        let count = markers.len() as u64;
        if count > 0 {
            info!(subject, count, "Revoked all sessions of subject");
        }
        Ok(count)
    }

    async fn remove(&self, payload: &SessionPayload, digest: &str) -> AppResult<()> {
        self.cache.delete(&keys::session(digest)).await?;
        self.cache
            .delete(&keys::session_owner(&subject_of(payload), digest))
            .await
    }
}

fn subject_of(payload: &SessionPayload) -> String {
    match payload.subject_kind {
        SubjectKind::User => keys::session_subject(Some(payload.user_id)),
        SubjectKind::SuperAdmin => keys::session_subject(None),
    }
}
