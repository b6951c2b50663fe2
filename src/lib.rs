//! Token revocation registry and the actix-web service that enforces it.
//!
//! The registry answers two questions on every authenticated request: was
//! this token denied individually, and was its principal revoked in bulk
//! after the token was issued.

pub mod auth;
pub mod configuration;
pub mod error;
pub mod middleware;
pub mod revocation;
pub mod routes;
pub mod startup;
pub mod telemetry;
