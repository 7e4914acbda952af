//! Handler tests for Items domain
//!
//! These drive the real router and the SQL repository, with a mocked
//! persistence gateway standing in for PostgreSQL:
//! - Request decoding (strict JSON, path ids)
//! - Response serialization and status codes
//! - Error responses never leaking storage detail

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::Utc;
use database::{GatewayError, MockPersistenceGateway, Row, RowCursor, SqlValue};
use domain_items::*;
use http_body_util::BodyExt;
use serde_json::json;
use tower::ServiceExt; // For oneshot()

fn app(gateway: MockPersistenceGateway) -> Router {
    handlers::router(PgItemRepository::new(Arc::new(gateway)))
}

fn item_row(id: i64, name: &str, quantity: &str) -> Row {
    Row::from_values([
        ("id", SqlValue::BigInt(id)),
        ("name", name.into()),
        ("quantity", quantity.into()),
        ("created_at", Utc::now().into()),
    ])
}

fn post_items(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/items")
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

fn delete_item(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn body_bytes(body: Body) -> Vec<u8> {
    body.collect().await.unwrap().to_bytes().to_vec()
}

// Helper to parse JSON response body
async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    serde_json::from_slice(&body_bytes(body).await).unwrap()
}

async fn error_message(body: Body) -> String {
    let error: axum_helpers::ErrorResponse = json_body(body).await;
    error.message
}

// ============================================================================
// GET /items
// ============================================================================

#[tokio::test]
async fn test_list_empty_returns_json_array() {
    let mut gateway = MockPersistenceGateway::new();
    gateway
        .expect_query()
        .times(1)
        .returning(|_, _| Ok(RowCursor::empty()));

    let response = app(gateway)
        .oneshot(Request::get("/items").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"],
        "application/json"
    );
    assert_eq!(body_bytes(response.into_body()).await, b"[]");
}

#[tokio::test]
async fn test_list_returns_items_newest_first() {
    let mut gateway = MockPersistenceGateway::new();
    gateway.expect_query().returning(|_, _| {
        Ok(RowCursor::new(vec![
            item_row(3, "Eggs", "12"),
            item_row(2, "Bread", "1 loaf"),
            item_row(1, "Milk", "2"),
        ]))
    });

    let response = app(gateway)
        .oneshot(Request::get("/items").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let items: Vec<Item> = json_body(response.into_body()).await;
    let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["Eggs", "Bread", "Milk"]);
}

#[tokio::test]
async fn test_list_storage_failure_is_generic_500() {
    let mut gateway = MockPersistenceGateway::new();
    gateway
        .expect_query()
        .returning(|_, _| Err(GatewayError::Query("relation \"items\" does not exist".into())));

    let response = app(gateway)
        .oneshot(Request::get("/items").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let message = error_message(response.into_body()).await;
    assert_eq!(message, "Internal Server Error");
}

#[tokio::test]
async fn test_list_iteration_failure_is_500() {
    let mut gateway = MockPersistenceGateway::new();
    gateway.expect_query().returning(|_, _| {
        Ok(RowCursor::from_results(vec![
            Ok(item_row(1, "Milk", "2")),
            Err(GatewayError::Iteration("unexpected EOF".into())),
        ]))
    });

    let response = app(gateway)
        .oneshot(Request::get("/items").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

// ============================================================================
// POST /items
// ============================================================================

#[tokio::test]
async fn test_create_returns_201_with_item() {
    let mut gateway = MockPersistenceGateway::new();
    gateway
        .expect_query_row()
        .withf(|sql, args| {
            sql.starts_with("INSERT INTO items")
                && *args == vec![SqlValue::from("Milk"), SqlValue::from("2 liters")]
        })
        .times(1)
        .returning(|_, _| {
            Ok(Row::from_values([
                ("id", SqlValue::BigInt(1)),
                ("created_at", Utc::now().into()),
            ]))
        });

    let response = app(gateway)
        .oneshot(post_items(
            json!({"name": "Milk", "quantity": "2 liters"}).to_string(),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let item: Item = json_body(response.into_body()).await;
    assert_eq!(item.id, 1);
    assert_eq!(item.name, "Milk");
    assert_eq!(item.quantity, "2 liters");
}

#[tokio::test]
async fn test_create_blank_fields_is_400_without_storage_call() {
    for body in [
        json!({"name": "   ", "quantity": "1"}),
        json!({"name": "Milk", "quantity": ""}),
        json!({"name": "Milk"}),
    ] {
        // No expectations: any gateway call panics.
        let response = app(MockPersistenceGateway::new())
            .oneshot(post_items(body.to_string()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{body}");
        let message = error_message(response.into_body()).await;
        assert!(message.contains("cannot be empty"), "{message}");
    }
}

#[tokio::test]
async fn test_create_rejects_bodies_with_distinct_messages() {
    let cases = [
        ("", "Request body must not be empty"),
        ("   \n", "Request body must not be empty"),
        (
            r#"{"name": "Milk", "quantity": }"#,
            "Request body contains badly-formed JSON (at line 1",
        ),
        (r#"{"name": "Milk""#, "Request body contains badly-formed JSON"),
        (
            r#"{"name": "Milk", "quantity": "1", "price": 3}"#,
            "Invalid request body: unknown field `price`",
        ),
        (
            r#"{"name": 123, "quantity": "1"}"#,
            r#"Invalid request body: invalid value for the "name" field"#,
        ),
        (
            r#"{"name": "Milk", "quantity": true}"#,
            r#"invalid value for the "quantity" field"#,
        ),
        (
            r#"{"name": "a", "quantity": "1"} {"name": "b", "quantity": "2"}"#,
            "Request body must only contain a single JSON object",
        ),
    ];

    for (body, expected) in cases {
        let response = app(MockPersistenceGateway::new())
            .oneshot(post_items(body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{body:?}");
        let message = error_message(response.into_body()).await;
        assert!(
            message.contains(expected),
            "body {body:?}: expected {expected:?} in {message:?}"
        );
    }
}

#[tokio::test]
async fn test_create_oversized_body_is_413() {
    let body = json!({"name": "x".repeat(axum_helpers::MAX_BODY_BYTES), "quantity": "1"});

    let response = app(MockPersistenceGateway::new())
        .oneshot(post_items(body.to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let message = error_message(response.into_body()).await;
    assert_eq!(message, "Request body must not be larger than 1MB");
}

#[tokio::test]
async fn test_create_storage_failure_is_generic_500() {
    let mut gateway = MockPersistenceGateway::new();
    gateway.expect_query_row().returning(|_, _| {
        Err(GatewayError::Connection(
            "password authentication failed for user \"user\"".into(),
        ))
    });

    let response = app(gateway)
        .oneshot(post_items(json!({"name": "Milk", "quantity": "2"}).to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let message = error_message(response.into_body()).await;
    assert!(!message.contains("password"));
}

#[tokio::test]
async fn test_concurrent_creates_get_distinct_ids() {
    let next_id = Arc::new(AtomicI64::new(1));
    let mut gateway = MockPersistenceGateway::new();
    gateway.expect_query_row().times(10).returning(move |_, _| {
        Ok(Row::from_values([
            ("id", SqlValue::BigInt(next_id.fetch_add(1, Ordering::SeqCst))),
            ("created_at", Utc::now().into()),
        ]))
    });
    let app = app(gateway);

    let requests = (0..10).map(|i| {
        let app = app.clone();
        async move {
            let response = app
                .oneshot(post_items(
                    json!({"name": format!("item-{i}"), "quantity": "1"}).to_string(),
                ))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::CREATED);
            json_body::<Item>(response.into_body()).await.id
        }
    });

    let mut ids = futures::future::join_all(requests).await;
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 10);
    assert!(ids.iter().all(|id| *id > 0));
}

// ============================================================================
// DELETE /items/{id}
// ============================================================================

#[tokio::test]
async fn test_delete_returns_204_with_empty_body() {
    let mut gateway = MockPersistenceGateway::new();
    gateway
        .expect_execute()
        .withf(|sql, args| sql.starts_with("DELETE FROM items") && *args == vec![SqlValue::BigInt(5)])
        .times(1)
        .returning(|_, _| Ok(1));

    let response = app(gateway).oneshot(delete_item("/items/5")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(response.into_body()).await.is_empty());
}

#[tokio::test]
async fn test_delete_missing_item_is_404() {
    let mut gateway = MockPersistenceGateway::new();
    gateway.expect_execute().returning(|_, _| Ok(0));

    let response = app(gateway).oneshot(delete_item("/items/999")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_storage_failure_is_500() {
    let mut gateway = MockPersistenceGateway::new();
    gateway
        .expect_execute()
        .returning(|_, _| Err(GatewayError::Query("canceling statement".into())));

    let response = app(gateway).oneshot(delete_item("/items/5")).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let message = error_message(response.into_body()).await;
    assert_eq!(message, "Internal Server Error");
}

#[tokio::test]
async fn test_delete_bad_ids_are_400() {
    let cases = [
        ("/items/abc", "Invalid item ID format: 'abc' is not a number"),
        ("/items/0", "Invalid item ID format: must be a positive integer"),
        ("/items/-7", "Invalid item ID format: must be a positive integer"),
        ("/items/", "Invalid URL format or missing item ID"),
    ];

    for (uri, expected) in cases {
        let response = app(MockPersistenceGateway::new())
            .oneshot(delete_item(uri))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(error_message(response.into_body()).await, expected);
    }
}

#[tokio::test]
async fn test_unsupported_method_is_405() {
    let response = app(MockPersistenceGateway::new())
        .oneshot(
            Request::builder()
                .method("PATCH")
                .uri("/items")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
