//! Failed-login counter entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Failed-login counter for one (email, source address) pair.
///
/// Created on the first failure, incremented on each later failure and
/// removed on success or once its lockout window is over.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserBlock {
    /// Unique row identifier.
    pub id: i64,
    /// Resolved user, when the login matched a known account.
    pub user_id: Option<i64>,
    /// Login as typed by the caller.
    pub email: String,
    /// Source address of the attempts.
    pub ip_address: String,
    /// Consecutive failures for the pair.
    pub error_logins_count: i32,
    /// Time of the last failure.
    pub time: DateTime<Utc>,
}

impl UserBlock {
    /// Seconds elapsed since the last failure, clamped at zero.
    pub fn elapsed_seconds(&self, now: DateTime<Utc>) -> i64 {
        (now - self.time).num_seconds().max(0)
    }

    /// Whole minutes elapsed since the last failure.
    pub fn elapsed_minutes(&self, now: DateTime<Utc>) -> i64 {
        self.elapsed_seconds(now) / 60
    }

    /// Whether the lockout window that started at the last failure is over.
    pub fn window_elapsed(&self, duration_minutes: i64, now: DateTime<Utc>) -> bool {
        self.elapsed_minutes(now) >= duration_minutes
    }

    /// Whether the pair is currently locked out.
    pub fn is_locked(&self, threshold: i32, duration_minutes: i64, now: DateTime<Utc>) -> bool {
        self.error_logins_count >= threshold && !self.window_elapsed(duration_minutes, now)
    }

    /// Seconds until the lockout window is over.
    pub fn retry_after_seconds(&self, duration_minutes: i64, now: DateTime<Utc>) -> u64 {
        let remaining = duration_minutes * 60 - self.elapsed_seconds(now);
        remaining.max(1) as u64
    }
}
