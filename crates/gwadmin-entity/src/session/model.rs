//! Session payload stored behind an opaque token.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Kind of subject a session was issued to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubjectKind {
    User,
    SuperAdmin,
}

/// Identity payload held in the cache under a session token.
///
/// Payloads are immutable once issued; refreshing a session revokes the
/// old token and issues a new one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionPayload {
    /// Whose session this is.
    pub subject_kind: SubjectKind,
    /// User id, or the SuperAdmin sentinel id.
    pub user_id: i64,
    /// Issue time.
    pub issued_at: DateTime<Utc>,
    /// Whether the caller asked for a persistent session.
    pub sign_me: bool,
    /// Absolute expiry, `None` for browser-session tokens.
    pub expires_at: Option<DateTime<Utc>>,
}

impl SessionPayload {
    /// Build a payload issued now.
    ///
    /// Persistent sessions expire after `persistent_days`; others carry no
    /// expiry of their own.
    pub fn new(subject_kind: SubjectKind, user_id: i64, sign_me: bool, persistent_days: u64) -> Self {
        let issued_at = Utc::now();
        let expires_at = sign_me.then(|| issued_at + Duration::days(persistent_days as i64));
        Self {
            subject_kind,
            user_id,
            issued_at,
            sign_me,
            expires_at,
        }
    }

    /// Whether the payload's own expiry has passed.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}
