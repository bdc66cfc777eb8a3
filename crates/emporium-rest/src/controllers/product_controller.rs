//! Product catalog controller.

use crate::{
    extractors::JsonBody,
    responses::{created, ok, ApiResult, CreatedResult},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    routing::{delete, get, post, put},
    Router,
};
use emporium_core::{
    CategoryId, Collection, ErrorResponse, NewProduct, Product, ProductId, RequestStatus,
    SubCategoryId,
};
use tracing::debug;

/// Creates the product router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/get/:id", get(get_product))
        .route("/all", get(get_products))
        .route("/category/:category_id", get(get_category_products))
        .route("/subcategory/:sub_category_id", get(get_sub_category_products))
        .route("/hero", get(get_hero_products))
        .route("/hero/category/:category_id", get(get_category_hero_products))
        .route("/search/:query", get(search_products))
        .route("/add", post(add_product))
        .route("/add/bulk", post(add_products))
        .route("/update/:id", put(update_product))
        .route("/delete/:id", delete(delete_product))
}

#[utoipa::path(
    get,
    path = "/products/get/{id}",
    tag = "products",
    params(("id" = i64, Path, description = "Product ID")),
    responses(
        (status = 200, body = Product),
        (status = 404, body = ErrorResponse)
    ),
    security(("api_key" = []))
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> ApiResult<Product> {
    ok(state.product_service.get_product(id).await?)
}

#[utoipa::path(
    get,
    path = "/products/all",
    tag = "products",
    responses((status = 200, body = Collection<Product>)),
    security(("api_key" = []))
)]
pub async fn get_products(State(state): State<AppState>) -> ApiResult<Collection<Product>> {
    ok(state.product_service.get_products().await?)
}

#[utoipa::path(
    get,
    path = "/products/category/{category_id}",
    tag = "products",
    params(("category_id" = i64, Path, description = "Category ID, 1 to 3")),
    responses(
        (status = 200, body = Collection<Product>),
        (status = 400, body = ErrorResponse)
    ),
    security(("api_key" = []))
)]
pub async fn get_category_products(
    State(state): State<AppState>,
    Path(category_id): Path<CategoryId>,
) -> ApiResult<Collection<Product>> {
    ok(state
        .product_service
        .get_category_products(category_id)
        .await?)
}

#[utoipa::path(
    get,
    path = "/products/subcategory/{sub_category_id}",
    tag = "products",
    params(("sub_category_id" = i64, Path, description = "Sub-category ID, 1 to 10")),
    responses(
        (status = 200, body = Collection<Product>),
        (status = 400, body = ErrorResponse)
    ),
    security(("api_key" = []))
)]
pub async fn get_sub_category_products(
    State(state): State<AppState>,
    Path(sub_category_id): Path<SubCategoryId>,
) -> ApiResult<Collection<Product>> {
    ok(state
        .product_service
        .get_sub_category_products(sub_category_id)
        .await?)
}

/// Products featured on the landing page.
#[utoipa::path(
    get,
    path = "/products/hero",
    tag = "products",
    responses((status = 200, body = Collection<Product>)),
    security(("api_key" = []))
)]
pub async fn get_hero_products(State(state): State<AppState>) -> ApiResult<Collection<Product>> {
    ok(state.product_service.get_hero_products().await?)
}

/// Products featured on a category page.
#[utoipa::path(
    get,
    path = "/products/hero/category/{category_id}",
    tag = "products",
    params(("category_id" = i64, Path, description = "Category ID, 1 to 3")),
    responses((status = 200, body = Collection<Product>)),
    security(("api_key" = []))
)]
pub async fn get_category_hero_products(
    State(state): State<AppState>,
    Path(category_id): Path<CategoryId>,
) -> ApiResult<Collection<Product>> {
    ok(state
        .product_service
        .get_category_hero_products(category_id)
        .await?)
}

/// Case-insensitive substring search on product names.
#[utoipa::path(
    get,
    path = "/products/search/{query}",
    tag = "products",
    params(("query" = String, Path, description = "Search text")),
    responses(
        (status = 200, body = Collection<Product>),
        (status = 400, body = ErrorResponse)
    ),
    security(("api_key" = []))
)]
pub async fn search_products(
    State(state): State<AppState>,
    Path(query): Path<String>,
) -> ApiResult<Collection<Product>> {
    debug!("Product search request: {}", query);
    ok(state.product_service.search_products(&query).await?)
}

#[utoipa::path(
    post,
    path = "/products/add",
    tag = "products",
    request_body = NewProduct,
    responses(
        (status = 201, body = Product),
        (status = 400, body = ErrorResponse)
    ),
    security(("api_key" = []))
)]
pub async fn add_product(
    State(state): State<AppState>,
    JsonBody(product): JsonBody<NewProduct>,
) -> CreatedResult<Product> {
    debug!("Add product request: {}", product.name);
    created(state.product_service.add_product(product).await?)
}

/// Store every product in one transaction, or none.
#[utoipa::path(
    post,
    path = "/products/add/bulk",
    tag = "products",
    request_body = Vec<NewProduct>,
    responses(
        (status = 201, body = Collection<Product>),
        (status = 400, body = ErrorResponse)
    ),
    security(("api_key" = []))
)]
pub async fn add_products(
    State(state): State<AppState>,
    JsonBody(products): JsonBody<Vec<NewProduct>>,
) -> CreatedResult<Collection<Product>> {
    debug!("Bulk add products request: {} products", products.len());
    created(state.product_service.add_products(products).await?)
}

#[utoipa::path(
    put,
    path = "/products/update/{id}",
    tag = "products",
    params(("id" = i64, Path, description = "Product ID")),
    request_body = NewProduct,
    responses(
        (status = 200, body = RequestStatus),
        (status = 404, body = ErrorResponse)
    ),
    security(("api_key" = []))
)]
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    JsonBody(product): JsonBody<NewProduct>,
) -> ApiResult<RequestStatus> {
    debug!("Update product request: {}", id);
    ok(state.product_service.update_product(id, product).await?)
}

#[utoipa::path(
    delete,
    path = "/products/delete/{id}",
    tag = "products",
    params(("id" = i64, Path, description = "Product ID")),
    responses((status = 200, body = RequestStatus)),
    security(("api_key" = []))
)]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> ApiResult<RequestStatus> {
    debug!("Delete product request: {}", id);
    ok(state.product_service.delete_product(id).await?)
}
