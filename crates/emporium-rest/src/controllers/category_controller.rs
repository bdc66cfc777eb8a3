//! Category controller. Read-only.

use crate::{
    responses::{ok, ApiResult},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    routing::get,
    Router,
};
use emporium_core::{Category, CategoryId, Collection, ErrorResponse, SubCategory, SubCategoryId};

/// Creates the category router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/get/:id", get(get_category))
        .route("/all", get(get_categories))
        .route("/subcategories/get/:id", get(get_sub_category))
        .route("/subcategories/all", get(get_sub_categories))
        .route(
            "/subcategories/category/:category_id",
            get(get_category_sub_categories),
        )
}

#[utoipa::path(
    get,
    path = "/categories/get/{id}",
    tag = "categories",
    params(("id" = i64, Path, description = "Category ID, 1 to 3")),
    responses(
        (status = 200, body = Category),
        (status = 400, body = ErrorResponse)
    ),
    security(("api_key" = []))
)]
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<CategoryId>,
) -> ApiResult<Category> {
    ok(state.category_service.get_category(id).await?)
}

#[utoipa::path(
    get,
    path = "/categories/all",
    tag = "categories",
    responses((status = 200, body = Collection<Category>)),
    security(("api_key" = []))
)]
pub async fn get_categories(State(state): State<AppState>) -> ApiResult<Collection<Category>> {
    ok(state.category_service.get_categories().await?)
}

#[utoipa::path(
    get,
    path = "/categories/subcategories/get/{id}",
    tag = "categories",
    params(("id" = i64, Path, description = "Sub-category ID, 1 to 10")),
    responses(
        (status = 200, body = SubCategory),
        (status = 400, body = ErrorResponse)
    ),
    security(("api_key" = []))
)]
pub async fn get_sub_category(
    State(state): State<AppState>,
    Path(id): Path<SubCategoryId>,
) -> ApiResult<SubCategory> {
    ok(state.category_service.get_sub_category(id).await?)
}

#[utoipa::path(
    get,
    path = "/categories/subcategories/all",
    tag = "categories",
    responses((status = 200, body = Collection<SubCategory>)),
    security(("api_key" = []))
)]
pub async fn get_sub_categories(
    State(state): State<AppState>,
) -> ApiResult<Collection<SubCategory>> {
    ok(state.category_service.get_sub_categories().await?)
}

#[utoipa::path(
    get,
    path = "/categories/subcategories/category/{category_id}",
    tag = "categories",
    params(("category_id" = i64, Path, description = "Category ID, 1 to 3")),
    responses((status = 200, body = Collection<SubCategory>)),
    security(("api_key" = []))
)]
pub async fn get_category_sub_categories(
    State(state): State<AppState>,
    Path(category_id): Path<CategoryId>,
) -> ApiResult<Collection<SubCategory>> {
    ok(state
        .category_service
        .get_category_sub_categories(category_id)
        .await?)
}
