//! Orders and order items.

use crate::validation::rules;
use crate::{AddressId, EmporiumError, EmporiumResult, OrderId, OrderItemId, ProductId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub address_id: AddressId,
    pub total_price: i32,
    pub created_at: DateTime<Utc>,
    pub status: String,
}

/// Fields of an order insert or whole-row update.
///
/// `created_at` arrives as text so that a malformed timestamp is reported
/// as a validation failure rather than a body decoding error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NewOrder {
    #[validate(custom(function = "rules::valid_id"))]
    pub user_id: UserId,
    #[validate(custom(function = "rules::valid_id"))]
    pub address_id: AddressId,
    #[validate(range(min = 1, message = "total price must be positive"))]
    pub total_price: i32,
    #[validate(custom(function = "rules::rfc3339"))]
    pub created_at: String,
    #[validate(custom(function = "rules::not_blank"))]
    pub status: String,
}

impl NewOrder {
    /// Parses `created_at` into UTC.
    pub fn created_at_utc(&self) -> EmporiumResult<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.created_at)
            .map(|ts| ts.with_timezone(&Utc))
            .map_err(|e| EmporiumError::validation(format!("created_at: {e}")))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct OrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub quantity: i32,
}

/// Fields of an order item insert or whole-row update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NewOrderItem {
    #[validate(custom(function = "rules::valid_id"))]
    pub order_id: OrderId,
    #[validate(custom(function = "rules::valid_id"))]
    pub product_id: ProductId,
    #[validate(range(min = 1, message = "invalid quantity, cannot be less than 1"))]
    pub quantity: i32,
}

impl OrderItem {
    #[must_use]
    pub fn from_new(id: OrderItemId, fields: NewOrderItem) -> Self {
        Self {
            id,
            order_id: fields.order_id,
            product_id: fields.product_id,
            quantity: fields.quantity,
        }
    }
}

/// An order together with its items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct DetailedOrder {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// A line of a detailed order insert; the order id is not known yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NewOrderLine {
    #[validate(custom(function = "rules::valid_id"))]
    pub product_id: ProductId,
    #[validate(range(min = 1, message = "invalid quantity, cannot be less than 1"))]
    pub quantity: i32,
}

impl NewOrderLine {
    /// Attaches the line to a stored order.
    #[must_use]
    pub fn for_order(&self, order_id: OrderId) -> NewOrderItem {
        NewOrderItem {
            order_id,
            product_id: self.product_id,
            quantity: self.quantity,
        }
    }
}

/// An order and its lines, written one row at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NewDetailedOrder {
    #[validate(nested)]
    pub order: NewOrder,
    #[validate(length(min = 1, message = "an order needs at least one item"), nested)]
    pub items: Vec<NewOrderLine>,
}
