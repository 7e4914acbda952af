use std::sync::Arc;

use async_trait::async_trait;
use database::{GatewayError, PersistenceGateway, SqlValue};
use tracing::{debug, error, info, instrument, warn};
use validator::Validate;

use crate::{
    error::{EMPTY_FIELDS_MESSAGE, ItemError, ItemResult},
    models::{Item, NewItem},
    repository::ItemRepository,
};

const CREATE_TABLE: &str = "\
CREATE TABLE IF NOT EXISTS items (
    id BIGSERIAL PRIMARY KEY,
    name TEXT NOT NULL CHECK (btrim(name) <> ''),
    quantity TEXT NOT NULL CHECK (btrim(quantity) <> ''),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)";

const CREATE_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_items_created_at ON items (created_at DESC)";

const SELECT_ITEMS: &str =
    "SELECT id, name, quantity, created_at FROM items ORDER BY created_at DESC, id DESC";

const INSERT_ITEM: &str =
    "INSERT INTO items (name, quantity) VALUES ($1, $2) RETURNING id, created_at";

const DELETE_ITEM: &str = "DELETE FROM items WHERE id = $1";

/// [`ItemRepository`] over a SQL [`PersistenceGateway`].
#[derive(Clone)]
pub struct PgItemRepository {
    gateway: Arc<dyn PersistenceGateway>,
}

impl PgItemRepository {
    pub fn new(gateway: Arc<dyn PersistenceGateway>) -> Self {
        Self { gateway }
    }

    /// Creates the `items` table and its ordering index when absent.
    ///
    /// Run once at startup; the service must not serve traffic if this fails.
    #[instrument(skip(self))]
    pub async fn ensure_schema(&self) -> ItemResult<()> {
        for statement in [CREATE_TABLE, CREATE_INDEX] {
            self.gateway
                .execute(statement, Vec::new())
                .await
                .map_err(|e| log_failure("create items schema", e))?;
        }
        info!("Items schema is in place");
        Ok(())
    }
}

fn log_failure(operation: &'static str, source: GatewayError) -> ItemError {
    error!(operation, error = %source, "Item storage call failed");
    ItemError::persistence(operation, source)
}

#[async_trait]
impl ItemRepository for PgItemRepository {
    #[instrument(skip(self))]
    async fn list(&self) -> ItemResult<Vec<Item>> {
        let rows = self
            .gateway
            .query(SELECT_ITEMS, Vec::new())
            .await
            .map_err(|e| log_failure("list items", e))?;

        let mut items = Vec::new();
        for row in rows {
            let row = row.map_err(|e| {
                error!(error = %e, read = items.len(), "Error after iterating item rows");
                ItemError::Iteration(e)
            })?;

            match Item::from_row(&row) {
                Ok(item) => items.push(item),
                Err(e) => warn!(error = %e, "Skipping item row that failed to decode"),
            }
        }

        debug!(count = items.len(), "Listed items");
        Ok(items)
    }

    #[instrument(skip(self, input), fields(name = %input.name, quantity = %input.quantity))]
    async fn create(&self, input: NewItem) -> ItemResult<Item> {
        if let Err(e) = input.trimmed().validate() {
            info!(error = %e, "Rejected item with blank fields");
            return Err(ItemError::Validation(EMPTY_FIELDS_MESSAGE.to_string()));
        }

        let row = self
            .gateway
            .query_row(
                INSERT_ITEM,
                vec![
                    SqlValue::from(input.name.as_str()),
                    SqlValue::from(input.quantity.as_str()),
                ],
            )
            .await
            .map_err(|e| log_failure("insert item", e))?;

        let id = row.get("id").map_err(|e| log_failure("insert item", e))?;
        let created_at = row
            .get("created_at")
            .map_err(|e| log_failure("insert item", e))?;

        let item = Item {
            id,
            name: input.name,
            quantity: input.quantity,
            created_at,
        };
        info!(item_id = item.id, "Added item");
        Ok(item)
    }

    #[instrument(skip(self, id), fields(item_id = id))]
    async fn delete(&self, id: i64) -> ItemResult<()> {
        let affected = self
            .gateway
            .execute(DELETE_ITEM, vec![SqlValue::BigInt(id)])
            .await
            .map_err(|e| log_failure("delete item", e))?;

        if affected == 0 {
            info!("Attempted to delete non-existent item");
            return Err(ItemError::NotFound(id));
        }

        info!("Deleted item");
        Ok(())
    }
}
