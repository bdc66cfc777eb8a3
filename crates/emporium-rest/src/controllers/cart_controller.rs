//! Cart controller.

use crate::{
    extractors::{JsonBody, UpdateRequest},
    responses::{created, ok, ApiResult, CreatedResult},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    routing::{delete, get, post, put},
    Router,
};
use emporium_core::{
    CartItem, CartItemId, Collection, ErrorResponse, NewCartItem, RequestStatus, UserId,
};
use tracing::debug;

/// Creates the cart router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/get/:id", get(get_cart_item))
        .route("/all/:user_id", get(get_user_cart_items))
        .route("/add", post(add_cart_item))
        .route("/add/bulk", post(add_cart_items))
        .route("/update", put(update_cart_item))
        .route("/delete/:id", delete(delete_cart_item))
}

/// Get a cart item by ID.
#[utoipa::path(
    get,
    path = "/cart/get/{id}",
    tag = "cart",
    params(("id" = i64, Path, description = "Cart item ID")),
    responses(
        (status = 200, body = CartItem),
        (status = 404, body = ErrorResponse)
    ),
    security(("api_key" = []))
)]
pub async fn get_cart_item(
    State(state): State<AppState>,
    Path(id): Path<CartItemId>,
) -> ApiResult<CartItem> {
    ok(state.cart_service.get_cart_item(id).await?)
}

/// Get the cart of a user.
#[utoipa::path(
    get,
    path = "/cart/all/{user_id}",
    tag = "cart",
    params(("user_id" = String, Path, description = "User ID")),
    responses((status = 200, body = Collection<CartItem>)),
    security(("api_key" = []))
)]
pub async fn get_user_cart_items(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> ApiResult<Collection<CartItem>> {
    ok(state.cart_service.get_user_cart_items(&user_id).await?)
}

/// Add an item to a cart.
#[utoipa::path(
    post,
    path = "/cart/add",
    tag = "cart",
    request_body = NewCartItem,
    responses(
        (status = 201, body = CartItem),
        (status = 400, body = ErrorResponse)
    ),
    security(("api_key" = []))
)]
pub async fn add_cart_item(
    State(state): State<AppState>,
    JsonBody(item): JsonBody<NewCartItem>,
) -> CreatedResult<CartItem> {
    debug!("Add cart item request for user {}", item.user_id);
    created(state.cart_service.add_cart_item(item).await?)
}

/// Add several items, one after the other.
#[utoipa::path(
    post,
    path = "/cart/add/bulk",
    tag = "cart",
    request_body = Vec<NewCartItem>,
    responses(
        (status = 201, body = Collection<CartItem>),
        (status = 400, body = ErrorResponse)
    ),
    security(("api_key" = []))
)]
pub async fn add_cart_items(
    State(state): State<AppState>,
    JsonBody(items): JsonBody<Vec<NewCartItem>>,
) -> CreatedResult<Collection<CartItem>> {
    debug!("Bulk add cart items request: {} items", items.len());
    created(state.cart_service.add_cart_items(items).await?)
}

/// Replace a cart item. The body carries the item `id`.
#[utoipa::path(
    put,
    path = "/cart/update",
    tag = "cart",
    request_body(content = NewCartItem, description = "Cart item fields plus its `id`"),
    responses(
        (status = 200, body = RequestStatus),
        (status = 404, body = ErrorResponse)
    ),
    security(("api_key" = []))
)]
pub async fn update_cart_item(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<UpdateRequest<CartItemId, NewCartItem>>,
) -> ApiResult<RequestStatus> {
    debug!("Update cart item request: {}", request.id);
    ok(state
        .cart_service
        .update_cart_item(request.id, request.fields)
        .await?)
}

/// Delete a cart item.
#[utoipa::path(
    delete,
    path = "/cart/delete/{id}",
    tag = "cart",
    params(("id" = i64, Path, description = "Cart item ID")),
    responses((status = 200, body = RequestStatus)),
    security(("api_key" = []))
)]
pub async fn delete_cart_item(
    State(state): State<AppState>,
    Path(id): Path<CartItemId>,
) -> ApiResult<RequestStatus> {
    debug!("Delete cart item request: {}", id);
    ok(state.cart_service.delete_cart_item(id).await?)
}
