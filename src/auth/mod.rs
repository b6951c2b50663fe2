/// Authentication module
///
/// Access token issuance/verification and token identifiers used by the
/// revocation registry.

mod claims;
mod fingerprint;
mod jwt;

pub use claims::{Claims, ADMIN_ROLE, VALIDATION_LEEWAY_SECS};
pub use fingerprint::token_fingerprint;
pub use jwt::acceptance_window_secs;
pub use jwt::generate_access_token;
pub use jwt::validate_access_token;
