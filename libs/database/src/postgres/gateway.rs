use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{ConnectionTrait, DatabaseBackend, DatabaseConnection, QueryResult, Statement, Value};
use tracing::{debug, error, info};

use super::{check_health, classify_db_err};
use crate::common::{GatewayError, GatewayResult};
use crate::gateway::{PersistenceGateway, Row, RowCursor, RowSource, SqlValue};

/// [`PersistenceGateway`] over a SeaORM-managed sqlx pool.
///
/// Cheap to clone; clones share the pool and the closed flag.
#[derive(Clone, Debug)]
pub struct PgGateway {
    db: DatabaseConnection,
    closed: Arc<AtomicBool>,
}

impl PgGateway {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// The underlying connection, for callers that need SeaORM directly
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    fn statement(sql: &str, args: Vec<SqlValue>) -> Statement {
        Statement::from_sql_and_values(
            DatabaseBackend::Postgres,
            sql,
            args.into_iter().map(into_value),
        )
    }
}

fn into_value(value: SqlValue) -> Value {
    match value {
        SqlValue::BigInt(v) => Value::from(v),
        SqlValue::Text(v) => Value::from(v),
        SqlValue::Timestamp(v) => Value::from(v),
        SqlValue::Null => Value::from(None::<String>),
    }
}

struct PgRow(QueryResult);

impl PgRow {
    fn decode<T: sea_orm::TryGetable>(&self, column: &str) -> GatewayResult<T> {
        self.0
            .try_get::<T>("", column)
            .map_err(|e| GatewayError::decode(column, e.to_string()))
    }
}

impl RowSource for PgRow {
    fn get_i64(&self, column: &str) -> GatewayResult<i64> {
        self.decode(column)
    }

    fn get_text(&self, column: &str) -> GatewayResult<String> {
        self.decode(column)
    }

    fn get_timestamp(&self, column: &str) -> GatewayResult<DateTime<Utc>> {
        self.decode(column)
    }
}

#[async_trait]
impl PersistenceGateway for PgGateway {
    async fn execute(&self, sql: &str, args: Vec<SqlValue>) -> GatewayResult<u64> {
        let result = self
            .db
            .execute_raw(Self::statement(sql, args))
            .await
            .map_err(classify_db_err)?;
        Ok(result.rows_affected())
    }

    async fn query(&self, sql: &str, args: Vec<SqlValue>) -> GatewayResult<RowCursor> {
        let rows = self
            .db
            .query_all_raw(Self::statement(sql, args))
            .await
            .map_err(classify_db_err)?;
        debug!(rows = rows.len(), "Query returned rows");
        Ok(RowCursor::new(
            rows.into_iter().map(|row| Row::new(PgRow(row))).collect(),
        ))
    }

    async fn query_row(&self, sql: &str, args: Vec<SqlValue>) -> GatewayResult<Row> {
        self.db
            .query_one_raw(Self::statement(sql, args))
            .await
            .map_err(classify_db_err)?
            .map(|row| Row::new(PgRow(row)))
            .ok_or(GatewayError::NoRows)
    }

    async fn ping(&self) -> GatewayResult<()> {
        check_health(&self.db).await
    }

    async fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            debug!("PostgreSQL pool already closed");
            return;
        }
        match self.db.clone().close().await {
            Ok(_) => info!("PostgreSQL connection closed successfully"),
            Err(e) => error!("Error closing PostgreSQL: {}", e),
        }
    }
}
