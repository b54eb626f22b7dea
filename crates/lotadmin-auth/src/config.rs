//! Authentication configuration.

/// Configuration for the authentication and account services.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Optional pepper prepended to passwords before Argon2id hashing.
    pub pepper: Option<String>,
    /// Minimum password length for policy enforcement.
    pub min_password_length: usize,
    /// Absolute session lifetime in seconds (default: 43_200 = 12 hours).
    pub session_max_age_secs: u64,
    /// Idle timeout in seconds (default: 1_800 = 30 minutes). A session
    /// lapses when no request has touched it for this long.
    pub session_idle_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            pepper: None,
            min_password_length: 12,
            session_max_age_secs: 43_200,
            session_idle_secs: 1_800,
        }
    }
}
