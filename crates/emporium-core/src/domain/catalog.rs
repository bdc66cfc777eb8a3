//! Catalog entities: products, categories and sub-categories.

use crate::validation::rules;
use crate::{CategoryId, ProductId, SubCategoryId};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Highest category id seeded in the catalog.
pub const MAX_CATEGORY_ID: i64 = 3;
/// Highest sub-category id seeded in the catalog.
pub const MAX_SUB_CATEGORY_ID: i64 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub description: String,
    pub offered: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SubCategory {
    pub id: SubCategoryId,
    pub name: String,
    pub description: String,
    #[serde(rename = "category")]
    pub category_id: CategoryId,
    pub offered: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    #[serde(rename = "category")]
    pub category_id: CategoryId,
    #[serde(rename = "subCategory")]
    pub sub_category_id: SubCategoryId,
    pub image_url: String,
    pub price: i32,
    pub previous_price: i32,
    pub offered: bool,
}

/// Fields of a product insert or whole-row update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    #[validate(custom(function = "rules::not_blank"))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "category")]
    #[validate(custom(function = "rules::valid_category"))]
    pub category_id: CategoryId,
    #[serde(rename = "subCategory")]
    #[validate(custom(function = "rules::valid_sub_category"))]
    pub sub_category_id: SubCategoryId,
    #[validate(custom(function = "rules::not_blank"))]
    pub image_url: String,
    #[validate(range(min = 1, message = "price must be positive"))]
    pub price: i32,
    #[serde(default)]
    #[validate(range(min = 0, message = "previous price cannot be negative"))]
    pub previous_price: i32,
    #[serde(default)]
    pub offered: bool,
}

impl Product {
    #[must_use]
    pub fn from_new(id: ProductId, fields: NewProduct) -> Self {
        Self {
            id,
            name: fields.name,
            description: fields.description,
            category_id: fields.category_id,
            sub_category_id: fields.sub_category_id,
            image_url: fields.image_url,
            price: fields.price,
            previous_price: fields.previous_price,
            offered: fields.offered,
        }
    }
}

/// Normalizes a free-text product search so equal queries share a cache entry.
#[must_use]
pub fn normalize_search_query(query: &str) -> String {
    query.trim().to_lowercase()
}
