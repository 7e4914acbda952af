use axum_helpers::server::{create_production_app, create_router, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use database::PersistenceGateway;
use database::postgres::{PgGateway, connect_from_config};
use domain_items::PgItemRepository;
use eyre::WrapErr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

mod api;
mod config;
mod openapi;

use config::{Config, Environment};

const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output (before any fallible operations)
    install_color_eyre();

    // Local runs read .env; production relies on the real environment
    let dotenv = Environment::from_env().load_dotenv();

    // Load configuration from environment variables
    let config = Config::from_env()?;

    // Initialize tracing with ErrorLayer for span trace capture
    init_tracing(&config.environment);

    if let Err(e) = dotenv {
        warn!(error = %e, "Ignoring unreadable .env file");
    }

    info!(
        name = config.app.name,
        version = config.app.version,
        "Starting shopping list API"
    );

    // Connect and ping once; no retry, a dead database aborts startup
    let db = connect_from_config(config.database.clone())
        .await
        .wrap_err("Could not connect to the database")?;
    let gateway = Arc::new(PgGateway::new(db));

    let repository = PgItemRepository::new(gateway.clone());
    if let Err(e) = repository.ensure_schema().await {
        gateway.close().await;
        return Err(eyre::Report::new(e).wrap_err("Could not create database schema"));
    }

    let api_routes = api::routes(repository, gateway.clone()).merge(health_router(config.app));

    // create_router adds docs/middleware to our composed routes
    let router = create_router::<openapi::ApiDoc>(api_routes, &config.server)?;

    info!("Starting shopping API with production-ready shutdown (30s timeout)");

    create_production_app(router, &config.server, SHUTDOWN_TIMEOUT, async move {
        info!("Shutting down: closing database connections");
        gateway.close().await;
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Shopping API shutdown complete");
    Ok(())
}
