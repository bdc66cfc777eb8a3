//! Order, order item and detailed order controller.

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
    Collection, DetailedOrder, ErrorResponse, NewDetailedOrder, NewOrder, NewOrderItem, Order,
    OrderId, OrderItem, OrderItemId, RequestStatus, UserId,
};
use tracing::debug;

/// Creates the order router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/get/:id", get(get_order))
        .route("/all/:user_id", get(get_user_orders))
        .route("/add", post(add_order))
        .route("/update", put(update_order))
        .route("/delete/:id", delete(delete_order))
        .route("/items/get/:id", get(get_order_item))
        .route("/items/all/:order_id", get(get_order_items))
        .route("/items/add", post(add_order_item))
        .route("/items/update", put(update_order_item))
        .route("/items/delete/:id", delete(delete_order_item))
        .route("/detailed/get/:order_id", get(get_detailed_order))
        .route("/detailed/all/:user_id", get(get_user_detailed_orders))
        .route("/detailed/add", post(add_detailed_order))
}

#[utoipa::path(
    get,
    path = "/orders/get/{id}",
    tag = "orders",
    params(("id" = String, Path, description = "Order ID")),
    responses(
        (status = 200, body = Order),
        (status = 404, body = ErrorResponse)
    ),
    security(("api_key" = []))
)]
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
) -> ApiResult<Order> {
    ok(state.order_service.get_order(&id).await?)
}

/// Orders of a user, oldest first.
#[utoipa::path(
    get,
    path = "/orders/all/{user_id}",
    tag = "orders",
    params(("user_id" = String, Path, description = "User ID")),
    responses((status = 200, body = Collection<Order>)),
    security(("api_key" = []))
)]
pub async fn get_user_orders(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> ApiResult<Collection<Order>> {
    ok(state.order_service.get_user_orders(&user_id).await?)
}

#[utoipa::path(
    post,
    path = "/orders/add",
    tag = "orders",
    request_body = NewOrder,
    responses(
        (status = 201, body = Order),
        (status = 400, body = ErrorResponse)
    ),
    security(("api_key" = []))
)]
pub async fn add_order(
    State(state): State<AppState>,
    JsonBody(order): JsonBody<NewOrder>,
) -> CreatedResult<Order> {
    debug!("Add order request for user {}", order.user_id);
    created(state.order_service.add_order(order).await?)
}

#[utoipa::path(
    put,
    path = "/orders/update",
    tag = "orders",
    request_body(content = NewOrder, description = "Order fields plus its `id`"),
    responses(
        (status = 200, body = RequestStatus),
        (status = 404, body = ErrorResponse)
    ),
    security(("api_key" = []))
)]
pub async fn update_order(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<UpdateRequest<OrderId, NewOrder>>,
) -> ApiResult<RequestStatus> {
    debug!("Update order request: {}", request.id);
    ok(state
        .order_service
        .update_order(&request.id, request.fields)
        .await?)
}

/// Delete an order with its items.
#[utoipa::path(
    delete,
    path = "/orders/delete/{id}",
    tag = "orders",
    params(("id" = String, Path, description = "Order ID")),
    responses((status = 200, body = RequestStatus)),
    security(("api_key" = []))
)]
pub async fn delete_order(
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
) -> ApiResult<RequestStatus> {
    debug!("Delete order request: {}", id);
    ok(state.order_service.delete_order(&id).await?)
}

#[utoipa::path(
    get,
    path = "/orders/items/get/{id}",
    tag = "orders",
    params(("id" = i64, Path, description = "Order item ID")),
    responses(
        (status = 200, body = OrderItem),
        (status = 404, body = ErrorResponse)
    ),
    security(("api_key" = []))
)]
pub async fn get_order_item(
    State(state): State<AppState>,
    Path(id): Path<OrderItemId>,
) -> ApiResult<OrderItem> {
    ok(state.order_service.get_order_item(id).await?)
}

#[utoipa::path(
    get,
    path = "/orders/items/all/{order_id}",
    tag = "orders",
    params(("order_id" = String, Path, description = "Order ID")),
    responses((status = 200, body = Collection<OrderItem>)),
    security(("api_key" = []))
)]
pub async fn get_order_items(
    State(state): State<AppState>,
    Path(order_id): Path<OrderId>,
) -> ApiResult<Collection<OrderItem>> {
    ok(state.order_service.get_order_items(&order_id).await?)
}

#[utoipa::path(
    post,
    path = "/orders/items/add",
    tag = "orders",
    request_body = NewOrderItem,
    responses(
        (status = 201, body = OrderItem),
        (status = 400, body = ErrorResponse)
    ),
    security(("api_key" = []))
)]
pub async fn add_order_item(
    State(state): State<AppState>,
    JsonBody(item): JsonBody<NewOrderItem>,
) -> CreatedResult<OrderItem> {
    debug!("Add order item request for order {}", item.order_id);
    created(state.order_service.add_order_item(item).await?)
}

#[utoipa::path(
    put,
    path = "/orders/items/update",
    tag = "orders",
    request_body(content = NewOrderItem, description = "Order item fields plus its `id`"),
    responses(
        (status = 200, body = RequestStatus),
        (status = 404, body = ErrorResponse)
    ),
    security(("api_key" = []))
)]
pub async fn update_order_item(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<UpdateRequest<OrderItemId, NewOrderItem>>,
) -> ApiResult<RequestStatus> {
    debug!("Update order item request: {}", request.id);
    ok(state
        .order_service
        .update_order_item(request.id, request.fields)
        .await?)
}

#[utoipa::path(
    delete,
    path = "/orders/items/delete/{id}",
    tag = "orders",
    params(("id" = i64, Path, description = "Order item ID")),
    responses((status = 200, body = RequestStatus)),
    security(("api_key" = []))
)]
pub async fn delete_order_item(
    State(state): State<AppState>,
    Path(id): Path<OrderItemId>,
) -> ApiResult<RequestStatus> {
    debug!("Delete order item request: {}", id);
    ok(state.order_service.delete_order_item(id).await?)
}

/// An order together with its items.
#[utoipa::path(
    get,
    path = "/orders/detailed/get/{order_id}",
    tag = "orders",
    params(("order_id" = String, Path, description = "Order ID")),
    responses(
        (status = 200, body = DetailedOrder),
        (status = 404, body = ErrorResponse)
    ),
    security(("api_key" = []))
)]
pub async fn get_detailed_order(
    State(state): State<AppState>,
    Path(order_id): Path<OrderId>,
) -> ApiResult<DetailedOrder> {
    ok(state.order_service.get_detailed_order(&order_id).await?)
}

#[utoipa::path(
    get,
    path = "/orders/detailed/all/{user_id}",
    tag = "orders",
    params(("user_id" = String, Path, description = "User ID")),
    responses((status = 200, body = Collection<DetailedOrder>)),
    security(("api_key" = []))
)]
pub async fn get_user_detailed_orders(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> ApiResult<Collection<DetailedOrder>> {
    ok(state.order_service.get_user_detailed_orders(&user_id).await?)
}

/// Store an order, then each of its items. Not atomic.
#[utoipa::path(
    post,
    path = "/orders/detailed/add",
    tag = "orders",
    request_body = NewDetailedOrder,
    responses(
        (status = 201, body = DetailedOrder),
        (status = 400, body = ErrorResponse)
    ),
    security(("api_key" = []))
)]
pub async fn add_detailed_order(
    State(state): State<AppState>,
    JsonBody(order): JsonBody<NewDetailedOrder>,
) -> CreatedResult<DetailedOrder> {
    debug!(
        "Add detailed order request for user {} with {} items",
        order.order.user_id,
        order.items.len()
    );
    created(state.order_service.add_detailed_order(order).await?)
}
