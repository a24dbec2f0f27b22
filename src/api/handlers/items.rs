//! Catalog item handlers.
//!
//! Listings run behind the pagination middleware and answer with the
//! paginated envelope.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    middleware,
};
use serde_json::{Map, json};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;
use uuid::Uuid;

use crate::api::doc::ITEM_TAG;
use crate::api::dto::{
    CreateItemRequest, ErrorResponse, ItemListQuery, ItemResponse, PaginatedResponse,
    send_paginated_response,
};
use crate::api::middleware::pagination_middleware;
use crate::error::AppResult;
use crate::pagination::{CursorMetadata, OffsetMetadata, Pagination, PaginationOptions};
use crate::state::AppState;
use crate::utils::validate::{ValidatedJson, ValidatedQuery};

/// Creates item routes.
///
/// Routes:
/// - GET /items         - Page-number listing
/// - POST /items        - Create item
/// - GET /items/feed    - Cursor listing
/// - GET /items/{id}    - Get item by ID
///
/// Only the two listings run the pagination middleware.
pub fn item_routes(pagination: Arc<PaginationOptions>) -> OpenApiRouter<AppState> {
    let listings = OpenApiRouter::new()
        .routes(routes!(list_items))
        .routes(routes!(list_item_feed))
        .route_layer(middleware::from_fn_with_state(
            pagination,
            pagination_middleware,
        ));

    OpenApiRouter::new()
        .routes(routes!(create_item))
        .routes(routes!(get_item))
        .merge(listings)
}

fn listing_mode(mode: &str) -> Map<String, serde_json::Value> {
    let mut extra = Map::new();
    extra.insert("mode".to_string(), json!(mode));
    extra
}

/// GET /api/items - List items by page number
#[utoipa::path(
    get,
    path = "/items",
    tag = ITEM_TAG,
    params(ItemListQuery),
    responses(
        (status = 200, description = "One page of items", body = PaginatedResponse<ItemResponse, OffsetMetadata>),
        (status = 400, description = "Invalid pagination or filter", body = ErrorResponse)
    )
)]
async fn list_items(
    State(state): State<AppState>,
    pagination: Pagination,
    ValidatedQuery(query): ValidatedQuery<ItemListQuery>,
) -> AppResult<Json<PaginatedResponse<ItemResponse, OffsetMetadata>>> {
    let listing = state
        .services
        .items
        .list_offset(&pagination, query.category.as_deref())
        .await?;

    let data = listing.items.into_iter().map(ItemResponse::from).collect();
    Ok(send_paginated_response(
        data,
        listing.metadata,
        None,
        listing_mode("offset"),
    ))
}

/// GET /api/items/feed - List items after a cursor
///
/// Pass the previous page's `nextCursor` as `cursor` to continue.
#[utoipa::path(
    get,
    path = "/items/feed",
    tag = ITEM_TAG,
    params(ItemListQuery),
    responses(
        (status = 200, description = "One cursor page of items", body = PaginatedResponse<ItemResponse, CursorMetadata>),
        (status = 400, description = "Invalid cursor or filter", body = ErrorResponse)
    )
)]
async fn list_item_feed(
    State(state): State<AppState>,
    pagination: Pagination,
    ValidatedQuery(query): ValidatedQuery<ItemListQuery>,
) -> AppResult<Json<PaginatedResponse<ItemResponse, CursorMetadata>>> {
    let page = state
        .services
        .items
        .list_cursor(&pagination, query.category.as_deref())
        .await?;

    let data = page.items.into_iter().map(ItemResponse::from).collect();
    Ok(send_paginated_response(
        data,
        page.metadata,
        None,
        listing_mode("cursor"),
    ))
}

/// POST /api/items - Create item
#[utoipa::path(
    post,
    path = "/items",
    tag = ITEM_TAG,
    request_body = CreateItemRequest,
    responses(
        (status = 201, description = "Item created", body = ItemResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse)
    )
)]
async fn create_item(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateItemRequest>,
) -> AppResult<(StatusCode, Json<ItemResponse>)> {
    let item = state
        .services
        .items
        .create_item(payload.into_new_item())
        .await?;
    Ok((StatusCode::CREATED, Json(ItemResponse::from(item))))
}

/// GET /api/items/{id} - Get item by ID
#[utoipa::path(
    get,
    path = "/items/{id}",
    tag = ITEM_TAG,
    params(("id" = Uuid, Path, description = "Item ID")),
    responses(
        (status = 200, description = "Item found", body = ItemResponse),
        (status = 404, description = "Item not found", body = ErrorResponse)
    )
)]
async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ItemResponse>> {
    let item = state.services.items.get_item(id).await?;
    Ok(Json(ItemResponse::from(item)))
}
