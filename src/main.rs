use std::net::TcpListener;
use std::sync::Arc;

use revocation_registry::configuration::get_configuration;
use revocation_registry::revocation::{spawn_sweeper, RevocationRegistry};
use revocation_registry::startup::run;
use revocation_registry::telemetry::init_telemetry;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    init_telemetry();

    tracing::info!("Starting application");

    let configuration = match get_configuration() {
        Ok(config) => {
            tracing::info!("Configuration loaded successfully");
            config
        }
        Err(e) => {
            tracing::error!("Failed to read configuration: {}", e);
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Configuration error",
            ));
        }
    };

    let registry = Arc::new(RevocationRegistry::in_memory());
    let sweeper = spawn_sweeper(registry.clone(), &configuration.revocation);
    if sweeper.is_none() {
        tracing::info!("Revocation sweeper disabled; expired entries are evicted on lookup only");
    }

    let address = configuration.application.address();
    let listener = TcpListener::bind(&address)?;
    tracing::info!("Server listening on: {}", address);

    let server = run(listener, configuration.jwt.clone(), registry)?;
    let result = server.await;

    if let Some(handle) = sweeper {
        handle.abort();
    }
    tracing::info!("Server stopped");

    result
}
