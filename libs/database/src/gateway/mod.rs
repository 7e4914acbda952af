//! Persistence gateway: the narrow surface the domain layer uses to talk to storage.
//!
//! Repositories depend on [`PersistenceGateway`] instead of a driver, so the
//! real pool ([`crate::postgres::PgGateway`]) and a pre-programmed double
//! (`MockPersistenceGateway`, behind the `mock` feature) are interchangeable.

mod row;
mod value;

pub use row::{FromColumn, Row, RowCursor, RowSource, ValueRow};
pub use value::SqlValue;

use async_trait::async_trait;

use crate::common::GatewayResult;

#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    /// Runs a statement and returns the number of affected rows.
    async fn execute(&self, sql: &str, args: Vec<SqlValue>) -> GatewayResult<u64>;

    /// Runs a query and returns its rows.
    async fn query(&self, sql: &str, args: Vec<SqlValue>) -> GatewayResult<RowCursor>;

    /// Runs a query expected to produce exactly one row.
    ///
    /// Fails with [`GatewayError::NoRows`](crate::GatewayError::NoRows) when
    /// the result set is empty.
    async fn query_row(&self, sql: &str, args: Vec<SqlValue>) -> GatewayResult<Row>;

    /// Checks that storage is reachable.
    async fn ping(&self) -> GatewayResult<()>;

    /// Releases pooled connections. Calling it again is a no-op.
    async fn close(&self);
}
