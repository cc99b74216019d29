//! Tenant entity model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::properties::Properties;

/// An isolated customer/organization scope owning users and groups.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Tenant {
    /// Unique tenant identifier.
    pub id: i64,
    /// Owning channel, `0` when the tenant is not attached to one.
    pub channel_id: i64,
    /// Disabled tenants cannot log in.
    pub is_disabled: bool,
    /// The fallback tenant for unknown web domains.
    pub is_default: bool,
    /// Unique tenant name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Host name under which the tenant is served.
    pub web_domain: String,
    /// Extension properties.
    #[sqlx(json)]
    pub properties: Properties,
}

impl Tenant {
    /// Whether the tenant belongs to a channel.
    pub fn has_channel(&self) -> bool {
        self.channel_id != 0
    }

    /// Case-insensitive comparison against a request host.
    pub fn serves_domain(&self, domain: &str) -> bool {
        !self.web_domain.is_empty() && self.web_domain.eq_ignore_ascii_case(domain)
    }
}

/// Data required to create a new tenant.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateTenant {
    /// Owning channel, `0` for none.
    pub channel_id: i64,
    /// Unique name.
    pub name: String,
    /// Description.
    pub description: String,
    /// Served host name.
    pub web_domain: String,
    /// Initial default flag.
    pub is_default: bool,
    /// Initial disabled flag.
    pub is_disabled: bool,
    /// Extension properties.
    pub properties: Properties,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serves_domain_ignores_case() {
        let tenant = Tenant {
            id: 1,
            channel_id: 0,
            is_disabled: false,
            is_default: false,
            name: "acme".into(),
            description: String::new(),
            web_domain: "Mail.Acme.com".into(),
            properties: Properties::default(),
        };
        assert!(tenant.serves_domain("mail.acme.com"));
        assert!(!tenant.serves_domain("acme.com"));
        assert!(!tenant.has_channel());
    }
}
