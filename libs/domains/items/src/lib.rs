//! Items Domain
//!
//! Shopping list items stored in PostgreSQL through the
//! [`PersistenceGateway`](database::PersistenceGateway) abstraction.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints, body and path decoding
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Validation, SQL, error classification
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Gateway   │  ← execute / query / query_row / ping / close
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use database::postgres::{PgGateway, PostgresConfig, connect_from_config};
//! use domain_items::{handlers, PgItemRepository};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = connect_from_config(PostgresConfig::default()).await?;
//! let repository = PgItemRepository::new(Arc::new(PgGateway::new(db)));
//! repository.ensure_schema().await?;
//!
//! let router = handlers::router(repository);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;

// Re-export commonly used types
pub use error::{ItemError, ItemResult};
pub use handlers::{ApiDoc, ItemId};
pub use models::{Item, NewItem};
pub use postgres::PgItemRepository;
pub use repository::ItemRepository;
