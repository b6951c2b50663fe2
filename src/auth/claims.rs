/// JWT Claims structure
///
/// Standard JWT claims (RFC 7519) plus the fields the revocation checks need:
/// `jti` keys the denylist, `iat_ms` is compared against principal marks.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const ADMIN_ROLE: &str = "admin";

/// Clock skew tolerated when checking `exp`. Denylist TTLs and mark retention
/// are derived from it, so it lives here and nowhere else.
pub const VALIDATION_LEEWAY_SECS: i64 = 0;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject (principal id)
    pub sub: String,
    pub role: String,
    /// Token id, unique per issued token
    #[serde(default)]
    pub jti: String,
    /// Expiration time (Unix timestamp, seconds)
    pub exp: i64,
    /// Issued at (Unix timestamp, seconds)
    pub iat: i64,
    /// Issued at in epoch milliseconds; same time base as revocation marks
    #[serde(default)]
    pub iat_ms: i64,
    pub iss: String,
}

impl Claims {
    pub fn new(principal_id: &str, role: &str, expiry_seconds: i64, issuer: String) -> Self {
        let now = chrono::Utc::now();
        let iat = now.timestamp();
        Self {
            sub: principal_id.to_string(),
            role: role.to_string(),
            jti: Uuid::new_v4().to_string(),
            exp: iat + expiry_seconds,
            iat,
            iat_ms: now.timestamp_millis(),
            iss: issuer,
        }
    }

    /// Issue instant in epoch ms, falling back to `iat` for tokens minted
    /// without `iat_ms`.
    pub fn issued_at_millis(&self) -> i64 {
        if self.iat_ms > 0 {
            self.iat_ms
        } else {
            self.iat.saturating_mul(1000)
        }
    }

    pub fn is_expired(&self) -> bool {
        self.exp < chrono::Utc::now().timestamp()
    }

    /// First whole second (Unix) at which verification rejects this token.
    /// `exp` itself is still accepted.
    pub fn rejected_from(&self) -> i64 {
        self.exp
            .saturating_add(VALIDATION_LEEWAY_SECS)
            .saturating_add(1)
    }

    /// Seconds until verification stops accepting the token, never below one
    /// so a denial always lands.
    pub fn remaining_lifetime_secs(&self) -> u64 {
        let remaining = self.rejected_from() - chrono::Utc::now().timestamp();
        u64::try_from(remaining).unwrap_or(0).max(1)
    }

    pub fn is_admin(&self) -> bool {
        self.role == ADMIN_ROLE
    }
}
