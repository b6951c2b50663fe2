#![allow(dead_code)]

use std::net::TcpListener;
use std::sync::Arc;

use revocation_registry::auth::generate_access_token;
use revocation_registry::configuration::JwtSettings;
use revocation_registry::revocation::RevocationRegistry;
use revocation_registry::startup::run;

pub struct TestApp {
    pub address: String,
    pub jwt: JwtSettings,
    pub registry: Arc<RevocationRegistry>,
}

impl TestApp {
    pub fn token_for(&self, user_id: &str, role: &str) -> String {
        generate_access_token(user_id, role, &self.jwt).expect("Failed to generate token")
    }
}

pub fn jwt_settings() -> JwtSettings {
    JwtSettings {
        secret: "test-secret-key-at-least-32-characters-long".to_string(),
        access_token_expiry: 900,
        issuer: "revocation-registry-tests".to_string(),
    }
}

pub fn spawn_app() -> TestApp {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    let jwt = jwt_settings();
    let registry = Arc::new(RevocationRegistry::in_memory());
    let server = run(listener, jwt.clone(), registry.clone()).expect("Failed to bind address");
    let _ = tokio::spawn(server);

    TestApp {
        address: format!("http://127.0.0.1:{}", port),
        jwt,
        registry,
    }
}
