use sea_orm::{ConnectionTrait, DatabaseBackend, DatabaseConnection, Statement};
use tracing::debug;

use crate::common::{GatewayError, GatewayResult};

/// Check PostgreSQL database health
///
/// Executes `SELECT 1` on a pooled connection. Any failure is reported as
/// [`GatewayError::Connection`]: if the trivial query cannot run, storage is
/// not usable.
///
/// # Example
/// ```ignore
/// use database::postgres::{connect_from_config, check_health};
///
/// let db = connect_from_config(config).await?;
/// check_health(&db).await?;
/// ```
pub async fn check_health(db: &DatabaseConnection) -> GatewayResult<()> {
    debug!("Running PostgreSQL health check");

    let stmt = Statement::from_string(DatabaseBackend::Postgres, "SELECT 1".to_owned());
    db.query_one_raw(stmt).await.map_err(|e| {
        GatewayError::Connection(format!("PostgreSQL health check failed: {}", e))
    })?;

    debug!("PostgreSQL health check passed");
    Ok(())
}
