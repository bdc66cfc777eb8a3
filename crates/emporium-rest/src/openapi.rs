//! OpenAPI documentation configuration.

use crate::controllers::{
    cart_controller, category_controller, health_controller, order_controller,
    product_controller, user_controller, HealthResponse,
};
use crate::state::ServiceInfo;
use emporium_core::{
    Address, CartItem, Category, DetailedOrder, ErrorResponse, FieldError, NewAddress,
    NewCartItem, NewDetailedOrder, NewOrder, NewOrderItem, NewOrderLine, NewProduct, NewUser,
    Order, OrderItem, Outcome, Product, RequestStatus, SubCategory, User, UserProfile,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// OpenAPI documentation for the Emporium API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Emporium API",
        version = "1.0.0",
        description = "Cart, order, catalog and user services with a cache-aside read path",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        cart_controller::get_cart_item,
        cart_controller::get_user_cart_items,
        cart_controller::add_cart_item,
        cart_controller::add_cart_items,
        cart_controller::update_cart_item,
        cart_controller::delete_cart_item,
        order_controller::get_order,
        order_controller::get_user_orders,
        order_controller::add_order,
        order_controller::update_order,
        order_controller::delete_order,
        order_controller::get_order_item,
        order_controller::get_order_items,
        order_controller::add_order_item,
        order_controller::update_order_item,
        order_controller::delete_order_item,
        order_controller::get_detailed_order,
        order_controller::get_user_detailed_orders,
        order_controller::add_detailed_order,
        product_controller::get_product,
        product_controller::get_products,
        product_controller::get_category_products,
        product_controller::get_sub_category_products,
        product_controller::get_hero_products,
        product_controller::get_category_hero_products,
        product_controller::search_products,
        product_controller::add_product,
        product_controller::add_products,
        product_controller::update_product,
        product_controller::delete_product,
        category_controller::get_category,
        category_controller::get_categories,
        category_controller::get_sub_category,
        category_controller::get_sub_categories,
        category_controller::get_category_sub_categories,
        user_controller::get_user,
        user_controller::get_users,
        user_controller::add_user,
        user_controller::update_user,
        user_controller::delete_user,
        user_controller::get_address,
        user_controller::get_user_addresses,
        user_controller::add_address,
        user_controller::update_address,
        user_controller::delete_address,
        health_controller::health_check,
        health_controller::readiness_check,
        health_controller::liveness_check,
        health_controller::core_info,
    ),
    components(
        schemas(
            ErrorResponse,
            FieldError,
            RequestStatus,
            Outcome,
            CartItem,
            NewCartItem,
            Order,
            NewOrder,
            OrderItem,
            NewOrderItem,
            DetailedOrder,
            NewDetailedOrder,
            NewOrderLine,
            Product,
            NewProduct,
            Category,
            SubCategory,
            User,
            NewUser,
            UserProfile,
            Address,
            NewAddress,
            HealthResponse,
            ServiceInfo,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "cart", description = "Shopping cart"),
        (name = "orders", description = "Orders, order items and detailed orders"),
        (name = "products", description = "Product catalog"),
        (name = "categories", description = "Categories and sub-categories"),
        (name = "users", description = "Users and addresses"),
        (name = "health", description = "Health and service information")
    )
)]
pub struct ApiDoc;

/// Bearer API key scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "api_key",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .description(Some("Shared API key sent as a bearer token"))
                        .build(),
                ),
            );
        }
    }
}
