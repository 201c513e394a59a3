use std::time::Duration;

use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Claims carried by an access token.
///
/// Timestamps are Unix seconds, matching the registered `iat` and `exp`
/// claims of RFC 7519.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (numeric user identifier)
    pub sub: i64,

    /// Username of the subject
    pub username: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Create claims for a user, issued now and expiring after `ttl`.
    ///
    /// # Arguments
    /// * `subject_id` - Unique user identifier
    /// * `username` - Username of the subject
    /// * `ttl` - Time until the token expires
    pub fn for_user(subject_id: i64, username: impl Into<String>, ttl: Duration) -> Self {
        Self::issued_at(subject_id, username, Utc::now().timestamp(), ttl)
    }

    /// Create claims with an explicit issue time.
    pub fn issued_at(
        subject_id: i64,
        username: impl Into<String>,
        issued_at: i64,
        ttl: Duration,
    ) -> Self {
        let ttl_secs = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);

        Self {
            sub: subject_id,
            username: username.into(),
            iat: issued_at,
            exp: issued_at.saturating_add(ttl_secs),
        }
    }

    /// Check if the claims are expired at `current_timestamp`.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        current_timestamp > self.exp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_user() {
        let claims = Claims::for_user(7, "alice", Duration::from_secs(3600));

        assert_eq!(claims.sub, 7);
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_issued_at_is_deterministic() {
        let first = Claims::issued_at(1, "admin", 1_700_000_000, Duration::from_secs(60));
        let second = Claims::issued_at(1, "admin", 1_700_000_000, Duration::from_secs(60));

        assert_eq!(first, second);
        assert_eq!(first.exp, 1_700_000_060);
    }

    #[test]
    fn test_huge_ttl_saturates() {
        let claims = Claims::issued_at(1, "admin", 10, Duration::from_secs(u64::MAX));
        assert_eq!(claims.exp, i64::MAX);
    }

    #[test]
    fn test_is_expired() {
        let claims = Claims::issued_at(1, "admin", 900, Duration::from_secs(100));

        assert!(!claims.is_expired(999)); // Not expired
        assert!(!claims.is_expired(1000)); // Exactly at expiration
        assert!(claims.is_expired(1001)); // Expired
    }
}
