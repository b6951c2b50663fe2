/// Session Routes
///
/// Logout of the current token, logout everywhere, and the current principal.
/// All routes sit behind `JwtMiddleware`, which injects the verified claims.

use actix_web::{web, HttpResponse};
use serde::Serialize;

use crate::auth::Claims;
use crate::error::AppError;
use crate::revocation::RevocationRegistry;

#[derive(Serialize)]
pub struct CurrentUserResponse {
    pub user_id: String,
    pub role: String,
    pub token_id: String,
    pub expires_at: i64,
}

/// GET /api/me
pub async fn current_user(claims: web::ReqData<Claims>) -> Result<HttpResponse, AppError> {
    let claims = claims.into_inner();

    Ok(HttpResponse::Ok().json(CurrentUserResponse {
        user_id: claims.sub,
        role: claims.role,
        token_id: claims.jti,
        expires_at: claims.exp,
    }))
}

/// POST /api/auth/logout
///
/// Denies the presented token for the rest of its lifetime. Other tokens of
/// the same principal stay valid.
pub async fn logout(
    claims: web::ReqData<Claims>,
    registry: web::Data<RevocationRegistry>,
) -> Result<HttpResponse, AppError> {
    let ttl_seconds = claims.remaining_lifetime_secs();
    registry.deny(&claims.jti, ttl_seconds);

    tracing::info!(user_id = %claims.sub, ttl_seconds, "User logged out");
    Ok(HttpResponse::NoContent().finish())
}

/// POST /api/auth/logout-all
///
/// Invalidates every token of the caller issued up to now, including the one
/// presented.
pub async fn logout_all(
    claims: web::ReqData<Claims>,
    registry: web::Data<RevocationRegistry>,
) -> Result<HttpResponse, AppError> {
    registry.revoke_all(&claims.sub);

    tracing::info!(user_id = %claims.sub, "User logged out everywhere");
    Ok(HttpResponse::NoContent().finish())
}
