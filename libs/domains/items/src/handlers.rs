use axum::{
    Json, Router,
    extract::{FromRequestParts, Path, State, rejection::PathRejection},
    http::{StatusCode, request::Parts},
    response::IntoResponse,
    routing::{delete, get},
};
use axum_helpers::{
    AppError, StrictJson,
    errors::{
        handlers::method_not_allowed,
        responses::{
            BadRequestIdResponse, BadRequestValidationResponse, InternalServerErrorResponse,
            NotFoundResponse, PayloadTooLargeResponse,
        },
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::ItemResult;
use crate::models::{Item, NewItem};
use crate::repository::ItemRepository;

/// OpenAPI documentation for Items API
#[derive(OpenApi)]
#[openapi(
    paths(list_items, create_item, delete_item),
    components(
        schemas(Item, NewItem),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestIdResponse,
            PayloadTooLargeResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Items", description = "Shopping list items")
    )
)]
pub struct ApiDoc;

/// Create the items router with all HTTP endpoints
///
/// Routes are absolute (`/items`, `/items/{id}`); merge the router rather
/// than nesting it. Unsupported methods answer 405.
pub fn router<R: ItemRepository + 'static>(repository: R) -> Router {
    let shared_repository = Arc::new(repository);

    Router::new()
        .route(
            "/items",
            get(list_items).post(create_item).fallback(method_not_allowed),
        )
        .route(
            "/items/",
            delete(missing_item_id).fallback(method_not_allowed),
        )
        .route(
            "/items/{id}",
            delete(delete_item).fallback(method_not_allowed),
        )
        .with_state(shared_repository)
}

/// Positive item id taken from the `{id}` path segment.
///
/// Rejections name the problem: not a number, not positive, or no segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemId(pub i64);

impl<S> FromRequestParts<S> for ItemId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| match rejection {
                PathRejection::MissingPathParams(_) => missing_id(),
                other => AppError::InvalidId(format!(
                    "Invalid item ID format: {}",
                    other.body_text()
                )),
            })?;
        parse_item_id(&raw).map(ItemId)
    }
}

/// Parses a path segment as a positive item id.
pub fn parse_item_id(raw: &str) -> Result<i64, AppError> {
    if raw.is_empty() {
        return Err(missing_id());
    }

    let id: i64 = raw.parse().map_err(|_| {
        AppError::InvalidId(format!("Invalid item ID format: '{raw}' is not a number"))
    })?;

    if id <= 0 {
        return Err(AppError::InvalidId(
            "Invalid item ID format: must be a positive integer".to_string(),
        ));
    }

    Ok(id)
}

fn missing_id() -> AppError {
    AppError::InvalidId("Invalid URL format or missing item ID".to_string())
}

/// List all items, newest first
#[utoipa::path(
    get,
    path = "/items",
    tag = "Items",
    responses(
        (status = 200, description = "All items, newest first", body = Vec<Item>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_items<R: ItemRepository>(
    State(repository): State<Arc<R>>,
) -> ItemResult<Json<Vec<Item>>> {
    let items = repository.list().await?;
    Ok(Json(items))
}

/// Add an item to the list
#[utoipa::path(
    post,
    path = "/items",
    tag = "Items",
    request_body = NewItem,
    responses(
        (status = 201, description = "Item created successfully", body = Item),
        (status = 400, response = BadRequestValidationResponse),
        (status = 413, response = PayloadTooLargeResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_item<R: ItemRepository>(
    State(repository): State<Arc<R>>,
    StrictJson(input): StrictJson<NewItem>,
) -> ItemResult<impl IntoResponse> {
    let item = repository.create(input).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// Delete an item
#[utoipa::path(
    delete,
    path = "/items/{id}",
    tag = "Items",
    params(
        ("id" = i64, Path, description = "Item ID, a positive integer")
    ),
    responses(
        (status = 204, description = "Item deleted successfully"),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_item<R: ItemRepository>(
    State(repository): State<Arc<R>>,
    ItemId(id): ItemId,
) -> ItemResult<StatusCode> {
    repository.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn missing_item_id() -> AppError {
    missing_id()
}
