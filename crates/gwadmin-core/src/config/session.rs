//! Session token configuration.

use serde::{Deserialize, Serialize};

/// Session token configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Lifetime of a persistent ("sign me in") session in days.
    #[serde(default = "default_persistent_days")]
    pub persistent_days: u64,
    /// Cookie and header name the token travels under.
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            persistent_days: default_persistent_days(),
            cookie_name: default_cookie_name(),
        }
    }
}

fn default_persistent_days() -> u64 {
    30
}

fn default_cookie_name() -> String {
    "AuthToken".to_string()
}
