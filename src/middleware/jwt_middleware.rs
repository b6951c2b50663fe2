/// JWT Authentication Middleware
///
/// Validates bearer tokens, then asks the revocation registry whether the
/// token was denied individually or predates its principal's revocation mark.
/// Accepted claims are injected into request extensions for route handlers.

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage,
};
use futures::future::LocalBoxFuture;
use std::rc::Rc;
use std::sync::Arc;

use crate::auth::{token_fingerprint, validate_access_token, Claims};
use crate::configuration::JwtSettings;
use crate::error::{AppError, AuthError};
use crate::revocation::RevocationRegistry;

/// JWT middleware for protecting routes
pub struct JwtMiddleware {
    jwt_config: JwtSettings,
    registry: Arc<RevocationRegistry>,
}

impl JwtMiddleware {
    pub fn new(jwt_config: JwtSettings, registry: Arc<RevocationRegistry>) -> Self {
        Self {
            jwt_config,
            registry,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtMiddlewareService<S>;
    type Future = std::future::Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        std::future::ready(Ok(JwtMiddlewareService {
            service: Rc::new(service),
            jwt_config: self.jwt_config.clone(),
            registry: self.registry.clone(),
        }))
    }
}

pub struct JwtMiddlewareService<S> {
    service: Rc<S>,
    jwt_config: JwtSettings,
    registry: Arc<RevocationRegistry>,
}

/// Pull the token out of `Authorization: Bearer <token>`.
fn bearer_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

/// Verify `token` and run the revocation checks, in that order: signature,
/// denylist, principal mark.
pub fn authenticate(
    token: &str,
    jwt_config: &JwtSettings,
    registry: &RevocationRegistry,
) -> Result<Claims, AppError> {
    let mut claims = validate_access_token(token, jwt_config)?;
    if claims.jti.is_empty() {
        claims.jti = token_fingerprint(token);
    }

    if registry.is_denied(&claims.jti) {
        tracing::warn!(user_id = %claims.sub, "Rejected denied token");
        return Err(AuthError::TokenRevoked.into());
    }

    if registry.is_revoked(&claims.sub, claims.issued_at_millis()) {
        tracing::warn!(
            user_id = %claims.sub,
            issued_at_ms = claims.issued_at_millis(),
            "Rejected token issued before revocation mark"
        );
        return Err(AuthError::TokenRevoked.into());
    }

    Ok(claims)
}

impl<S, B> Service<ServiceRequest> for JwtMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let outcome = match bearer_token(&req) {
            None => {
                tracing::warn!("Missing or invalid Authorization header");
                Err(AppError::Auth(AuthError::MissingToken))
            }
            Some(token) => authenticate(&token, &self.jwt_config, &self.registry),
        };

        match outcome {
            Ok(claims) => {
                tracing::debug!(user_id = %claims.sub, "JWT validated successfully");
                req.extensions_mut().insert(claims);

                let service = self.service.clone();
                Box::pin(async move { service.call(req).await })
            }
            Err(e) => Box::pin(async move { Err::<ServiceResponse<B>, Error>(e.into()) }),
        }
    }
}
