use std::sync::Arc;

use axum::Router;
use database::PersistenceGateway;
use domain_items::{PgItemRepository, handlers};

pub mod health;

/// Creates the API routes: `/items`, `/items/{id}` and `/healthz`.
///
/// Routes are mounted at the root, not under `/api`; the reverse proxy in
/// front of the service owns any prefix.
pub fn routes(repository: PgItemRepository, gateway: Arc<dyn PersistenceGateway>) -> Router {
    Router::new()
        .merge(handlers::router(repository))
        .merge(health::router(gateway))
}
