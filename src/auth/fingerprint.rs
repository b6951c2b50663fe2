/// Stable token identifiers for tokens that carry no `jti`.

use sha2::{Digest, Sha256};

/// SHA-256 hex of the raw bearer string. Keeps raw credentials out of the
/// denylist and out of logs.
pub fn token_fingerprint(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.trim().as_bytes());
    format!("{:x}", hasher.finalize())
}
