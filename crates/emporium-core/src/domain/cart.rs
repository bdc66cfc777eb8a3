//! Shopping cart entities.

use crate::validation::rules;
use crate::{CartItemId, ProductId, UserId};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A product line in a user's cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CartItem {
    pub id: CartItemId,
    pub product_id: ProductId,
    pub quantity: i32,
    pub user_id: UserId,
}

/// Fields of a cart item insert or whole-row update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NewCartItem {
    #[validate(custom(function = "rules::valid_id"))]
    pub product_id: ProductId,
    #[validate(range(min = 1, message = "invalid quantity, cannot be less than 1"))]
    pub quantity: i32,
    #[validate(custom(function = "rules::valid_id"))]
    pub user_id: UserId,
}

impl CartItem {
    /// Merges a store-assigned id with the inserted fields.
    #[must_use]
    pub fn from_new(id: CartItemId, fields: NewCartItem) -> Self {
        Self {
            id,
            product_id: fields.product_id,
            quantity: fields.quantity,
            user_id: fields.user_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ValidateExt;

    fn fields() -> NewCartItem {
        NewCartItem {
            product_id: ProductId::new(5),
            quantity: 2,
            user_id: UserId::new("7"),
        }
    }

    #[test]
    fn test_valid_cart_item() {
        assert!(fields().validate_request().is_ok());
    }

    #[test]
    fn test_rejects_non_positive_quantity() {
        let mut item = fields();
        item.quantity = 0;
        let err = item.validate_request().unwrap_err();
        assert!(err.to_string().contains("cannot be less than 1"));
    }

    #[test]
    fn test_rejects_missing_references() {
        let item = NewCartItem {
            product_id: ProductId::new(0),
            quantity: 1,
            user_id: UserId::new(" "),
        };
        let message = item.validate_request().unwrap_err().to_string();
        assert!(message.contains("product_id"));
        assert!(message.contains("user_id"));
    }
}
