/// Middleware module
///
/// Request logging and JWT authentication backed by the revocation registry.

mod jwt_middleware;
mod request_logger;

pub use jwt_middleware::{authenticate, JwtMiddleware};
pub use request_logger::RequestLogger;
