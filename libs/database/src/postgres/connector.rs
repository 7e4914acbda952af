use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::{error, info};

use super::{PostgresConfig, check_health, classify_db_err};
use crate::common::GatewayResult;

/// Connect using a PostgresConfig and verify the connection with a ping.
///
/// There is no retry: an unreachable database fails startup immediately. When
/// the ping fails the freshly built pool is closed before returning.
///
/// # Example
/// ```ignore
/// use database::postgres::{PostgresConfig, connect_from_config};
/// use core_config::FromEnv;
///
/// let db = connect_from_config(PostgresConfig::from_env()?).await?;
/// ```
pub async fn connect_from_config(config: PostgresConfig) -> GatewayResult<DatabaseConnection> {
    info!(url = %config.redacted_url(), max_connections = config.max_connections, "Connecting to PostgreSQL");
    connect_with_options(config.into_connect_options()).await
}

/// Connect with custom connection options
///
/// Use this when you need fine-grained control over connection pool settings.
pub async fn connect_with_options(options: ConnectOptions) -> GatewayResult<DatabaseConnection> {
    let db = Database::connect(options).await.map_err(classify_db_err)?;

    if let Err(e) = check_health(&db).await {
        error!(error = %e, "PostgreSQL did not answer the startup ping");
        if let Err(close_err) = db.close().await {
            error!(error = %close_err, "Error closing PostgreSQL pool");
        }
        return Err(e);
    }

    info!("Successfully connected to PostgreSQL database");
    Ok(db)
}
