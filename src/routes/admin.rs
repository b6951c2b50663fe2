/// Admin Routes
///
/// Forced invalidation (password reset, account lock) and the registry's
/// operational counters. Both require the `admin` role.

use actix_web::{web, HttpResponse};

use crate::auth::Claims;
use crate::error::{AppError, AuthError};
use crate::revocation::RevocationRegistry;

fn require_admin(claims: &Claims) -> Result<(), AppError> {
    if claims.is_admin() {
        Ok(())
    } else {
        tracing::warn!(user_id = %claims.sub, role = %claims.role, "Admin route refused");
        Err(AuthError::Forbidden.into())
    }
}

/// POST /api/admin/users/{user_id}/revoke
pub async fn force_logout(
    claims: web::ReqData<Claims>,
    path: web::Path<String>,
    registry: web::Data<RevocationRegistry>,
) -> Result<HttpResponse, AppError> {
    require_admin(&claims)?;
    let user_id = path.into_inner();

    registry.revoke_all(&user_id);

    tracing::info!(admin_id = %claims.sub, user_id = %user_id, "Forced logout");
    Ok(HttpResponse::NoContent().finish())
}

/// GET /api/admin/revocations/stats
pub async fn revocation_stats(
    claims: web::ReqData<Claims>,
    registry: web::Data<RevocationRegistry>,
) -> Result<HttpResponse, AppError> {
    require_admin(&claims)?;
    Ok(HttpResponse::Ok().json(registry.stats()))
}
