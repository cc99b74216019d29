//! Request context carrying the authenticated caller.

use chrono::{DateTime, Utc};

use gwadmin_entity::session::Identity;
use gwadmin_entity::user::Role;

/// Context for the current authenticated request.
///
/// Built by the transport after the access guard has resolved the token
/// and passed into service methods so that every operation knows who is
/// acting.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// The resolved caller.
    pub identity: Identity,
    /// IP address of the request origin.
    pub ip_address: String,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    pub fn new(identity: Identity, ip_address: impl Into<String>) -> Self {
        Self {
            identity,
            ip_address: ip_address.into(),
            request_time: Utc::now(),
        }
    }

    pub fn role(&self) -> Role {
        self.identity.role()
    }

    pub fn user_id(&self) -> Option<i64> {
        self.identity.user_id()
    }

    pub fn tenant_id(&self) -> Option<i64> {
        self.identity.tenant_id()
    }

    pub fn is_super_admin(&self) -> bool {
        self.identity.is_super_admin()
    }
}
