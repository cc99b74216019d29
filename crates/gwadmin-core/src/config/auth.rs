//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Authentication and credential configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Brute-force lockout policy.
    #[serde(default)]
    pub brute_force: BruteForceConfig,
    /// Virtual SuperAdmin credentials.
    #[serde(default)]
    pub super_admin: SuperAdminConfig,
}

/// Brute-force lockout policy.
///
/// Counters are kept per (email, source address). When `enabled` is false
/// every check is a no-op.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BruteForceConfig {
    /// Whether the guard is consulted at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Failed attempts after which a pair is locked.
    #[serde(default = "default_max_failed")]
    pub max_failed_attempts: i32,
    /// Lockout window in whole minutes.
    #[serde(default = "default_lockout")]
    pub lockout_duration_minutes: i64,
    /// Distinct locked pairs sharing one address that flag the address itself.
    #[serde(default = "default_ip_reputation")]
    pub ip_reputation_threshold: i64,
}

impl Default for BruteForceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_failed_attempts: default_max_failed(),
            lockout_duration_minutes: default_lockout(),
            ip_reputation_threshold: default_ip_reputation(),
        }
    }
}

/// Credentials of the virtual SuperAdmin identity.
///
/// An empty `login` disables the SuperAdmin verifier.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SuperAdminConfig {
    /// Login name.
    #[serde(default)]
    pub login: String,
    /// Argon2 PHC hash of the password.
    #[serde(default)]
    pub password_hash: String,
}

impl SuperAdminConfig {
    /// Whether a SuperAdmin login is configured.
    pub fn is_configured(&self) -> bool {
        !self.login.trim().is_empty() && !self.password_hash.is_empty()
    }
}

fn default_true() -> bool {
    true
}

fn default_max_failed() -> i32 {
    5
}

fn default_lockout() -> i64 {
    30
}

fn default_ip_reputation() -> i64 {
    10
}
