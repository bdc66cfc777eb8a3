//! User and address controller.

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
    Address, AddressId, Collection, ErrorResponse, NewAddress, NewUser, RequestStatus, User,
    UserId, UserProfile,
};
use tracing::debug;

/// Creates the user router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/get/:id", get(get_user))
        .route("/all", get(get_users))
        .route("/add", post(add_user))
        .route("/update", put(update_user))
        .route("/delete/:id", delete(delete_user))
        .route("/addresses/get/:id", get(get_address))
        .route("/addresses/user/:user_id", get(get_user_addresses))
        .route("/addresses/add", post(add_address))
        .route("/addresses/update", put(update_address))
        .route("/addresses/delete/:id", delete(delete_address))
}

#[utoipa::path(
    get,
    path = "/users/get/{id}",
    tag = "users",
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, body = User),
        (status = 404, body = ErrorResponse)
    ),
    security(("api_key" = []))
)]
pub async fn get_user(State(state): State<AppState>, Path(id): Path<UserId>) -> ApiResult<User> {
    ok(state.user_service.get_user(&id).await?)
}

/// Every user. Always read from the store.
#[utoipa::path(
    get,
    path = "/users/all",
    tag = "users",
    responses((status = 200, body = Collection<User>)),
    security(("api_key" = []))
)]
pub async fn get_users(State(state): State<AppState>) -> ApiResult<Collection<User>> {
    ok(state.user_service.get_users().await?)
}

#[utoipa::path(
    post,
    path = "/users/add",
    tag = "users",
    request_body = NewUser,
    responses(
        (status = 201, body = User),
        (status = 400, body = ErrorResponse),
        (status = 409, body = ErrorResponse)
    ),
    security(("api_key" = []))
)]
pub async fn add_user(
    State(state): State<AppState>,
    JsonBody(user): JsonBody<NewUser>,
) -> CreatedResult<User> {
    debug!("Add user request: {}", user.id);
    created(state.user_service.add_user(user).await?)
}

#[utoipa::path(
    put,
    path = "/users/update",
    tag = "users",
    request_body(content = UserProfile, description = "Profile fields plus the user `id`"),
    responses(
        (status = 200, body = RequestStatus),
        (status = 404, body = ErrorResponse)
    ),
    security(("api_key" = []))
)]
pub async fn update_user(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<UpdateRequest<UserId, UserProfile>>,
) -> ApiResult<RequestStatus> {
    debug!("Update user request: {}", request.id);
    ok(state
        .user_service
        .update_user(&request.id, request.fields)
        .await?)
}

/// Delete a user with their addresses, cart and orders.
#[utoipa::path(
    delete,
    path = "/users/delete/{id}",
    tag = "users",
    params(("id" = String, Path, description = "User ID")),
    responses((status = 200, body = RequestStatus)),
    security(("api_key" = []))
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
) -> ApiResult<RequestStatus> {
    debug!("Delete user request: {}", id);
    ok(state.user_service.delete_user(&id).await?)
}

#[utoipa::path(
    get,
    path = "/users/addresses/get/{id}",
    tag = "users",
    params(("id" = i64, Path, description = "Address ID")),
    responses(
        (status = 200, body = Address),
        (status = 404, body = ErrorResponse)
    ),
    security(("api_key" = []))
)]
pub async fn get_address(
    State(state): State<AppState>,
    Path(id): Path<AddressId>,
) -> ApiResult<Address> {
    ok(state.address_service.get_address(id).await?)
}

#[utoipa::path(
    get,
    path = "/users/addresses/user/{user_id}",
    tag = "users",
    params(("user_id" = String, Path, description = "User ID")),
    responses((status = 200, body = Collection<Address>)),
    security(("api_key" = []))
)]
pub async fn get_user_addresses(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> ApiResult<Collection<Address>> {
    ok(state.address_service.get_user_addresses(&user_id).await?)
}

#[utoipa::path(
    post,
    path = "/users/addresses/add",
    tag = "users",
    request_body = NewAddress,
    responses(
        (status = 201, body = Address),
        (status = 400, body = ErrorResponse)
    ),
    security(("api_key" = []))
)]
pub async fn add_address(
    State(state): State<AppState>,
    JsonBody(address): JsonBody<NewAddress>,
) -> CreatedResult<Address> {
    debug!("Add address request for user {}", address.user_id);
    created(state.address_service.add_address(address).await?)
}

#[utoipa::path(
    put,
    path = "/users/addresses/update",
    tag = "users",
    request_body(content = NewAddress, description = "Address fields plus its `id`"),
    responses(
        (status = 200, body = RequestStatus),
        (status = 404, body = ErrorResponse)
    ),
    security(("api_key" = []))
)]
pub async fn update_address(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<UpdateRequest<AddressId, NewAddress>>,
) -> ApiResult<RequestStatus> {
    debug!("Update address request: {}", request.id);
    ok(state
        .address_service
        .update_address(request.id, request.fields)
        .await?)
}

#[utoipa::path(
    delete,
    path = "/users/addresses/delete/{id}",
    tag = "users",
    params(("id" = i64, Path, description = "Address ID")),
    responses((status = 200, body = RequestStatus)),
    security(("api_key" = []))
)]
pub async fn delete_address(
    State(state): State<AppState>,
    Path(id): Path<AddressId>,
) -> ApiResult<RequestStatus> {
    debug!("Delete address request: {}", id);
    ok(state.address_service.delete_address(id).await?)
}
