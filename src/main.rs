use std::{fs, io, time::Duration};

use crate::{
    backend::DocumentBackend, configuration::Configuration,
    configuration_handler::ConfigurationHandler, database_interface::DatabaseInterface,
    http::create_app, local_documents::LocalDocuments, types::Document,
};
use tokio::time::sleep;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod auth;
mod backend;
mod bookings;
mod catalog;
mod configuration;
mod configuration_handler;
mod database_interface;
mod error;
mod http;
mod local_documents;
mod schema;
#[cfg(test)]
mod testutils;
mod types;

/// Checks the backend once and seeds the service catalog before any request is served.
fn prepare_backend<T: DocumentBackend>(
    backend: &T,
    configuration: &impl Configuration,
) -> io::Result<()> {
    backend.ping().map_err(io::Error::other)?;
    info!("Pinged backend. Successfully connected");

    if let Some(services_file) = configuration.services_file() {
        let services: Vec<Document> = serde_json::from_str(&fs::read_to_string(&services_file)?)?;
        let inserted = backend
            .insert_services(services)
            .map_err(io::Error::other)?;
        info!(inserted, file = %services_file.display(), "Seeded services");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> io::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let configuration = ConfigurationHandler::parse_arguments();

    let address = format!("0.0.0.0:{}", configuration.port());
    let listener = tokio::net::TcpListener::bind(&address).await?;

    let app = if let Some(database_url) = configuration.database_url() {
        let backend = loop {
            match DatabaseInterface::new(&database_url) {
                Ok(backend) => {
                    info!("Successfully connected to database");
                    break backend;
                }
                Err(err) => {
                    error!(%err, "Failed to establish database connection. Retry in 1 sec.");
                    sleep(Duration::from_secs(1)).await;
                }
            }
        };
        prepare_backend(&backend, &configuration)?;
        create_app(backend, configuration.clone())
    } else {
        warn!("No database configured. Bookings are kept in memory only");
        let backend = LocalDocuments::default();
        prepare_backend(&backend, &configuration)?;
        create_app(backend, configuration.clone())
    };

    info!("Car Doctor Server Is Running On Port {}", configuration.port());
    axum::serve(listener, app).await
}
