/// JWT Token Generation and Validation

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::auth::claims::{Claims, VALIDATION_LEEWAY_SECS};
use crate::configuration::JwtSettings;
use crate::error::{AppError, AuthError};

/// Issue an access token for `principal_id`.
///
/// # Errors
/// Returns error if token encoding fails
pub fn generate_access_token(
    principal_id: &str,
    role: &str,
    config: &JwtSettings,
) -> Result<String, AppError> {
    let claims = Claims::new(
        principal_id,
        role,
        config.access_token_expiry,
        config.issuer.clone(),
    );

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))
}

/// Seconds a freshly issued token stays acceptable to `validate_access_token`.
pub fn acceptance_window_secs(config: &JwtSettings) -> i64 {
    config
        .access_token_expiry
        .saturating_add(VALIDATION_LEEWAY_SECS)
        .saturating_add(1)
}

/// Verify signature, expiry and issuer, and extract the claims.
///
/// Revocation is not checked here; see `JwtMiddleware`.
pub fn validate_access_token(token: &str, config: &JwtSettings) -> Result<Claims, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = VALIDATION_LEEWAY_SECS as u64;
    validation.set_issuer(&[&config.issuer]);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| {
        tracing::warn!("JWT validation error: {}", e);
        AppError::Auth(AuthError::TokenInvalid)
    })
}
