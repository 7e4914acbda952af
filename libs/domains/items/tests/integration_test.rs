//! Repository tests against a real PostgreSQL
//!
//! Run with `cargo test -p domain_items -- --ignored` (needs Docker).

use std::sync::Arc;

use database::postgres::{PgGateway, connect_from_config};
use database::{PersistenceGateway, SqlValue};
use domain_items::*;
use test_utils::{TestDataBuilder, TestDatabase};

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_create_list_delete_round_trip() {
    let db = TestDatabase::new().await;
    let gateway = Arc::new(PgGateway::new(db.connection()));
    let repo = PgItemRepository::new(gateway.clone());
    repo.ensure_schema().await.unwrap();
    // Second run is a no-op
    repo.ensure_schema().await.unwrap();

    let builder = TestDataBuilder::from_test_name("round_trip");
    let first = repo
        .create(NewItem::new(builder.name("item", "first"), builder.quantity()))
        .await
        .unwrap();
    let second = repo
        .create(NewItem::new(
            format!("  {}  ", builder.name("item", "second")),
            "1 kg",
        ))
        .await
        .unwrap();

    assert!(first.id > 0);
    assert!(second.id > first.id);
    assert_eq!(second.name, builder.name("item", "second"));

    let items = repo.list().await.unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].id, second.id, "newest first");

    repo.delete(first.id).await.unwrap();
    let items = repo.list().await.unwrap();
    assert!(items.iter().all(|item| item.id != first.id));

    let err = repo.delete(first.id).await.unwrap_err();
    assert!(matches!(err, ItemError::NotFound(id) if id == first.id));

    gateway.close().await;
    gateway.close().await;
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_storage_rejects_blank_values() {
    let db = TestDatabase::new().await;
    let gateway = Arc::new(PgGateway::new(connect_from_config(db.postgres_config()).await.unwrap()));
    PgItemRepository::new(gateway.clone())
        .ensure_schema()
        .await
        .unwrap();

    let result = gateway
        .execute(
            "INSERT INTO items (name, quantity) VALUES ($1, $2)",
            vec![SqlValue::from("  "), SqlValue::from("1")],
        )
        .await;
    assert!(result.is_err());

    assert!(gateway.ping().await.is_ok());
}
