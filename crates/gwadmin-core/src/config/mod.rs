//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section, and every field carries a serde default so an empty source
//! still yields a usable development configuration.

pub mod app;
pub mod auth;
pub mod cache;
pub mod database;
pub mod logging;
pub mod session;
pub mod tenancy;

use serde::{Deserialize, Serialize};

pub use self::app::ServerConfig;
pub use self::auth::{AuthConfig, BruteForceConfig, SuperAdminConfig};
pub use self::cache::{CacheConfig, MemoryCacheConfig, RedisCacheConfig};
pub use self::database::DatabaseConfig;
pub use self::logging::LoggingConfig;
pub use self::session::SessionConfig;
pub use self::tenancy::TenancyConfig;

use crate::error::AppError;

/// Environment variable prefix for configuration overrides.
pub const ENV_PREFIX: &str = "GWADMIN";

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database connection settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Cache provider settings.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Authentication settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Session token settings.
    #[serde(default)]
    pub session: SessionConfig,
    /// Tenancy mode.
    #[serde(default)]
    pub tenancy: TenancyConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges the default configuration with an environment-specific overlay
    /// and environment variables prefixed with `GWADMIN__`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_source_yields_defaults() {
        let config: AppConfig = config::Config::builder()
            .build()
            .and_then(|c| c.try_deserialize())
            .unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database.url, "memory");
        assert_eq!(config.cache.provider, "memory");
        assert!(config.auth.brute_force.enabled);
        assert_eq!(config.auth.brute_force.max_failed_attempts, 5);
        assert_eq!(config.session.persistent_days, 30);
        assert!(config.tenancy.multi_tenant);
    }

    #[test]
    fn test_toml_overrides_nested_sections() {
        let toml = r#"
            [auth.brute_force]
            max_failed_attempts = 3
            lockout_duration_minutes = 5

            [tenancy]
            multi_tenant = false
        "#;
        let config: AppConfig = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .and_then(|c| c.try_deserialize())
            .unwrap();

        assert_eq!(config.auth.brute_force.max_failed_attempts, 3);
        assert_eq!(config.auth.brute_force.lockout_duration_minutes, 5);
        assert_eq!(config.auth.brute_force.ip_reputation_threshold, 10);
        assert!(!config.tenancy.multi_tenant);
    }
}
