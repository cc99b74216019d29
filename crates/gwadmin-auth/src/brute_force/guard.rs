//! Brute-force guard.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, warn};

use gwadmin_core::config::BruteForceConfig;
use gwadmin_core::error::AppError;
use gwadmin_core::result::AppResult;
use gwadmin_database::store::{UserBlockStore, UserStore};

/// Lockout bookkeeping backed by the `user_blocks` table.
///
/// Lockouts are lifted lazily: nothing sweeps expired rows, the next check
/// for the pair deletes a row whose window has elapsed. When the feature
/// is disabled every operation is a no-op.
#[derive(Debug, Clone)]
pub struct BruteForceGuard {
    blocks: Arc<dyn UserBlockStore>,
    users: Arc<dyn UserStore>,
    config: BruteForceConfig,
}

impl BruteForceGuard {
    pub fn new(
        blocks: Arc<dyn UserBlockStore>,
        users: Arc<dyn UserStore>,
        config: BruteForceConfig,
    ) -> Self {
        Self {
            blocks,
            users,
            config,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Fail with `AccountBlocked` while the pair is locked out.
    pub async fn is_blocked(&self, email: &str, ip: &str) -> AppResult<()> {
        if !self.config.enabled {
            return Ok(());
        }
        let email = normalize(email);
        let Some(block) = self.blocks.find(&email, ip).await? else {
            return Ok(());
        };

        let now = Utc::now();
        let duration = self.config.lockout_duration_minutes;

        if block.window_elapsed(duration, now) {
            // A failure recorded since the read keeps the row.
            if self.blocks.delete_stale(&email, ip, block.time).await? {
                debug!(email = %email, ip, "Removed stale login block");
            }
            return Ok(());
        }

        if block.is_locked(self.config.max_failed_attempts, duration, now) {
            let retry_after = block.retry_after_seconds(duration, now);
            warn!(
                email = %email,
                ip,
                failures = block.error_logins_count,
                retry_after,
                "Login blocked"
            );
            return Err(AppError::account_blocked(retry_after));
        }

        Ok(())
    }

    /// Count one more failure for the pair.
    ///
    /// The row stores the user id when the login names a known account.
    pub async fn record_failure(&self, email: &str, ip: &str) -> AppResult<()> {
        if !self.config.enabled {
            return Ok(());
        }
        let email = normalize(email);
        let user_id = self.users.find_by_public_id(&email).await?.map(|u| u.id);
        let block = self
            .blocks
            .record_failure(&email, ip, user_id, Utc::now())
            .await?;

        warn!(
            email = %email,
            ip,
            failures = block.error_logins_count,
            "Failed login recorded"
        );
        Ok(())
    }

    /// Forget the pair's failures.
    pub async fn record_success(&self, email: &str, ip: &str) -> AppResult<()> {
        if !self.config.enabled {
            return Ok(());
        }
        let email = normalize(email);
        if self.blocks.delete(&email, ip).await? {
            debug!(email = %email, ip, "Cleared login block after success");
        }
        Ok(())
    }

    /// Whether the address has locked out at least the reputation threshold
    /// of distinct logins whose windows are still running.
    pub async fn ip_reputation(&self, ip: &str) -> AppResult<bool> {
        Ok(self.reputation_retry_after(ip, Utc::now()).await?.is_some())
    }

    /// Fail with `AccountBlocked` while the address has a bad reputation.
    pub async fn check_ip_reputation(&self, ip: &str) -> AppResult<()> {
        match self.reputation_retry_after(ip, Utc::now()).await? {
            Some(retry_after) => {
                warn!(ip, retry_after, "Address blocked by reputation");
                Err(AppError::account_blocked(retry_after))
            }
            None => Ok(()),
        }
    }

    /// Delete every block row of a user, by id or by login.
    pub async fn purge_user(&self, user_id: i64, public_id: &str) -> AppResult<u64> {
        let removed = self
            .blocks
            .delete_for_user(user_id, &normalize(public_id))
            .await?;
        if removed > 0 {
            info!(user_id, removed, "Purged login blocks of user");
        }
        Ok(removed)
    }

    /// Seconds until the address drops below the reputation threshold,
    /// `None` when it is already below.
    async fn reputation_retry_after(&self, ip: &str, now: DateTime<Utc>) -> AppResult<Option<u64>> {
        let threshold = self.config.ip_reputation_threshold;
        if !self.config.enabled || threshold <= 0 {
            return Ok(None);
        }

        let window = Duration::minutes(self.config.lockout_duration_minutes);
        let times = self
            .blocks
            .locked_times_for_ip(ip, self.config.max_failed_attempts, now - window)
            .await?;

        let threshold = threshold as usize;
        if times.len() < threshold {
            return Ok(None);
        }

        // Oldest first: the address recovers once all but threshold - 1
        // of these windows are over.
        let pivot = times[times.len() - threshold];
        let remaining = (pivot + window - now).num_seconds().max(1);
        Ok(Some(remaining as u64))
    }
}

/// Logins are compared trimmed and case-insensitively.
fn normalize(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use gwadmin_core::ErrorKind;
    use gwadmin_database::MemoryDatabase;

    fn config() -> BruteForceConfig {
        BruteForceConfig {
            enabled: true,
            max_failed_attempts: 3,
            lockout_duration_minutes: 5,
            ip_reputation_threshold: 2,
        }
    }

    fn guard(db: &Arc<MemoryDatabase>, config: BruteForceConfig) -> BruteForceGuard {
        BruteForceGuard::new(db.clone(), db.clone(), config)
    }

    #[tokio::test]
    async fn test_lockout_after_threshold() {
        let db = Arc::new(MemoryDatabase::new());
        let guard = guard(&db, config());

        for _ in 0..3 {
            guard.is_blocked("a@x.com", "1.2.3.4").await.unwrap();
            guard.record_failure("a@x.com", "1.2.3.4").await.unwrap();
        }

        let err = guard.is_blocked("a@x.com", "1.2.3.4").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::AccountBlocked);
        let retry = err.retry_after_seconds.unwrap();
        assert!(retry > 240 && retry <= 300);

        // Same login from another address is unaffected.
        guard.is_blocked("a@x.com", "5.6.7.8").await.unwrap();
    }

    #[tokio::test]
    async fn test_login_is_normalized() {
        let db = Arc::new(MemoryDatabase::new());
        let guard = guard(&db, config());

        for login in ["A@X.com", " a@x.com ", "a@x.COM"] {
            guard.record_failure(login, "1.2.3.4").await.unwrap();
        }
        assert!(guard.is_blocked("a@x.com", "1.2.3.4").await.is_err());
        assert_eq!(db.block_count().await, 1);
    }

    #[tokio::test]
    async fn test_elapsed_window_unblocks_and_deletes_row() {
        let db = Arc::new(MemoryDatabase::new());
        let guard = guard(&db, config());

        for _ in 0..3 {
            guard.record_failure("a@x.com", "1.2.3.4").await.unwrap();
        }
        assert!(db.backdate_block("a@x.com", "1.2.3.4", Duration::minutes(6)).await);

        guard.is_blocked("a@x.com", "1.2.3.4").await.unwrap();
        assert_eq!(db.block_count().await, 0);
    }

    #[tokio::test]
    async fn test_whole_minutes_keep_lock_until_boundary() {
        let db = Arc::new(MemoryDatabase::new());
        let guard = guard(&db, config());

        for _ in 0..3 {
            guard.record_failure("a@x.com", "1.2.3.4").await.unwrap();
        }
        db.backdate_block("a@x.com", "1.2.3.4", Duration::seconds(4 * 60 + 50))
            .await;

        assert!(guard.is_blocked("a@x.com", "1.2.3.4").await.is_err());
        assert_eq!(db.block_count().await, 1);
    }

    #[tokio::test]
    async fn test_success_clears_counter() {
        let db = Arc::new(MemoryDatabase::new());
        let guard = guard(&db, config());

        guard.record_failure("a@x.com", "1.2.3.4").await.unwrap();
        guard.record_failure("a@x.com", "1.2.3.4").await.unwrap();
        guard.record_success("a@x.com", "1.2.3.4").await.unwrap();
        assert_eq!(db.block_count().await, 0);

        guard.record_failure("a@x.com", "1.2.3.4").await.unwrap();
        let block = db.find("a@x.com", "1.2.3.4").await.unwrap().unwrap();
        assert_eq!(block.error_logins_count, 1);
    }

    #[tokio::test]
    async fn test_concurrent_failures_count_twice() {
        let db = Arc::new(MemoryDatabase::new());
        let guard = guard(&db, config());

        let (a, b) = tokio::join!(
            guard.record_failure("a@x.com", "1.2.3.4"),
            guard.record_failure("A@x.com", "1.2.3.4"),
        );
        a.unwrap();
        b.unwrap();

        let block = db.find("a@x.com", "1.2.3.4").await.unwrap().unwrap();
        assert_eq!(block.error_logins_count, 2);
        assert_eq!(db.block_count().await, 1);
    }

    #[tokio::test]
    async fn test_ip_reputation_counts_distinct_locked_logins() {
        let db = Arc::new(MemoryDatabase::new());
        let guard = guard(&db, config());

        for login in ["a@x.com", "b@x.com"] {
            for _ in 0..3 {
                guard.record_failure(login, "9.9.9.9").await.unwrap();
            }
        }
        // Below threshold on a third login does not matter.
        guard.record_failure("c@x.com", "9.9.9.9").await.unwrap();

        assert!(guard.ip_reputation("9.9.9.9").await.unwrap());
        assert!(!guard.ip_reputation("1.1.1.1").await.unwrap());

        let err = guard.check_ip_reputation("9.9.9.9").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::AccountBlocked);
    }

    #[tokio::test]
    async fn test_ip_reputation_ignores_expired_blocks() {
        let db = Arc::new(MemoryDatabase::new());
        let guard = guard(&db, config());

        for login in ["a@x.com", "b@x.com"] {
            for _ in 0..3 {
                guard.record_failure(login, "9.9.9.9").await.unwrap();
            }
        }
        db.backdate_block("a@x.com", "9.9.9.9", Duration::minutes(10))
            .await;

        assert!(!guard.ip_reputation("9.9.9.9").await.unwrap());
    }

    #[tokio::test]
    async fn test_disabled_guard_is_noop() {
        let db = Arc::new(MemoryDatabase::new());
        let guard = guard(
            &db,
            BruteForceConfig {
                enabled: false,
                ..config()
            },
        );

        for _ in 0..10 {
            guard.record_failure("a@x.com", "1.2.3.4").await.unwrap();
        }
        guard.is_blocked("a@x.com", "1.2.3.4").await.unwrap();
        assert!(!guard.ip_reputation("1.2.3.4").await.unwrap());
        assert_eq!(db.block_count().await, 0);
    }
}
