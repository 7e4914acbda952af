//! PostgreSQL backend: pool configuration, connection, health check and the
//! [`PgGateway`] implementation of the persistence gateway.

mod config;
mod connector;
mod gateway;
mod health;

pub use config::PostgresConfig;
pub use connector::{connect_from_config, connect_with_options};
pub use gateway::PgGateway;
pub use health::check_health;

// Re-export SeaORM types for convenience
pub use sea_orm::{ConnectOptions, DatabaseConnection, DbErr};

use crate::common::GatewayError;

/// Splits driver errors into "storage unreachable" and "statement failed".
pub(crate) fn classify_db_err(err: DbErr) -> GatewayError {
    match &err {
        DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => GatewayError::Connection(err.to_string()),
        _ => GatewayError::Query(err.to_string()),
    }
}
