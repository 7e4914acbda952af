//! Database access for the shopping service.
//!
//! The domain layer only sees the [`PersistenceGateway`] trait and the
//! driver-neutral [`Row`], [`RowCursor`], [`SqlValue`] and [`GatewayError`]
//! types. The `postgres` module provides the real implementation.
//!
//! # Features
//!
//! - `postgres` (default) - PostgreSQL gateway with SeaORM
//! - `config` (default) - `core_config::FromEnv` for [`postgres::PostgresConfig`]
//! - `mock` - exports `MockPersistenceGateway` for tests in other crates
//!
//! # Example
//!
//! ```ignore
//! use database::postgres::{PgGateway, PostgresConfig, connect_from_config};
//! use database::PersistenceGateway;
//!
//! let db = connect_from_config(PostgresConfig::default()).await?;
//! let gateway = PgGateway::new(db);
//! gateway.ping().await?;
//! ```

pub mod common;
pub mod gateway;

#[cfg(feature = "postgres")]
pub mod postgres;

pub use common::{GatewayError, GatewayResult};
pub use gateway::{FromColumn, PersistenceGateway, Row, RowCursor, RowSource, SqlValue, ValueRow};

#[cfg(any(test, feature = "mock"))]
pub use gateway::MockPersistenceGateway;
