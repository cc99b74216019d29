//! Cache key builders for every gwadmin cache entry.
//!
//! Centralising key construction prevents typos and makes it easy to find
//! every key the application uses. Providers add their own prefix.

// ── Session keys ───────────────────────────────────────────

/// Payload of a session, addressed by the token digest.
pub fn session(token_digest: &str) -> String {
    format!("session:{token_digest}")
}

/// Cache-key segment naming a session subject (`user:{id}` or `superadmin`).
pub fn session_subject(user_id: Option<i64>) -> String {
    match user_id {
        Some(id) => format!("user:{id}"),
        None => "superadmin".to_string(),
    }
}

/// Ownership marker linking a session digest to its subject.
pub fn session_owner(subject: &str, token_digest: &str) -> String {
    format!("session:owner:{subject}:{token_digest}")
}

/// Pattern matching every ownership marker of a subject.
pub fn session_owner_pattern(subject: &str) -> String {
    format!("session:owner:{subject}:*")
}

// ── Tenant keys ────────────────────────────────────────────

/// Memoised tenant id for a request host.
pub fn tenant_by_domain(domain: &str) -> String {
    format!("tenant:domain:{}", domain.to_ascii_lowercase())
}

/// Pattern matching every memoised tenant lookup.
pub fn tenant_pattern() -> String {
    "tenant:*".to_string()
}
