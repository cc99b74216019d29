//! Tenancy mode configuration.

use serde::{Deserialize, Serialize};

/// Tenancy mode configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenancyConfig {
    /// When false the request web domain is not matched against the tenant.
    #[serde(default = "default_multi_tenant")]
    pub multi_tenant: bool,
}

impl Default for TenancyConfig {
    fn default() -> Self {
        Self {
            multi_tenant: default_multi_tenant(),
        }
    }
}

fn default_multi_tenant() -> bool {
    true
}
