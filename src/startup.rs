use actix_web::dev::Server;
use actix_web::{web, App, HttpServer};
use std::net::TcpListener;
use std::sync::Arc;

use crate::configuration::JwtSettings;
use crate::middleware::{JwtMiddleware, RequestLogger};
use crate::revocation::RevocationRegistry;
use crate::routes::{current_user, force_logout, health_check, logout, logout_all, revocation_stats};

pub fn run(
    listener: TcpListener,
    jwt_config: JwtSettings,
    registry: Arc<RevocationRegistry>,
) -> Result<Server, std::io::Error> {
    let registry_data = web::Data::from(registry.clone());

    let server = HttpServer::new(move || {
        App::new()
            .wrap(RequestLogger)
            .app_data(registry_data.clone())
            // Public routes
            .route("/health_check", web::get().to(health_check))
            // Protected routes (require a valid, unrevoked JWT)
            .service(
                web::scope("/api")
                    .wrap(JwtMiddleware::new(jwt_config.clone(), registry.clone()))
                    .route("/me", web::get().to(current_user))
                    .route("/auth/logout", web::post().to(logout))
                    .route("/auth/logout-all", web::post().to(logout_all))
                    .route("/admin/users/{user_id}/revoke", web::post().to(force_logout))
                    .route("/admin/revocations/stats", web::get().to(revocation_stats)),
            )
    })
    .listen(listener)?
    .run();

    Ok(server)
}
