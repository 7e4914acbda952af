use async_trait::async_trait;

use crate::error::ItemResult;
use crate::models::{Item, NewItem};

/// Repository trait for Item persistence
///
/// Implementations own validation and translate storage failures into
/// [`ItemError`](crate::ItemError) variants, so handlers never see
/// storage-specific errors.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// All items, newest first. Empty when there are none.
    async fn list(&self) -> ItemResult<Vec<Item>>;

    /// Trim, validate and insert an item
    async fn create(&self, input: NewItem) -> ItemResult<Item>;

    /// Delete an item by ID
    async fn delete(&self, id: i64) -> ItemResult<()>;
}
