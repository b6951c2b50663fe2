mod admin;
mod health_check;
mod session;

pub use admin::{force_logout, revocation_stats};
pub use health_check::health_check;
pub use session::{current_user, logout, logout_all};
