//! Cache keyspaces: one per cached store read.
//!
//! Keys have the form `emporium:<keyspace>/<key>`, where `<key>` is the
//! argument of the store read (an id, a parent id, [`ALL`] or a normalized
//! search query).

use std::fmt::Display;
use std::time::Duration;

/// Prefix shared by every cache key of the service.
const CACHE_PREFIX: &str = "emporium";

/// Lifetime of carts, orders, users and addresses.
pub const TRANSACTIONAL_TTL: Duration = Duration::from_secs(2 * 60 * 60);

/// Lifetime of catalog data: products, categories and sub-categories.
pub const CATALOG_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Key of the whole-table entries.
pub const ALL: &str = "all";

/// A named family of cache entries sharing a TTL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Keyspace {
    pub name: &'static str,
    pub ttl: Duration,
}

impl Keyspace {
    #[must_use]
    pub const fn new(name: &'static str, ttl: Duration) -> Self {
        Self { name, ttl }
    }

    /// Full cache key of one entry.
    #[must_use]
    pub fn key(&self, key: impl Display) -> String {
        format!("{CACHE_PREFIX}:{}/{key}", self.name)
    }

    /// Glob matching every entry of the keyspace.
    #[must_use]
    pub fn pattern(&self) -> String {
        format!("{CACHE_PREFIX}:{}/*", self.name)
    }
}

pub const CART_ITEM: Keyspace = Keyspace::new("cart-item-cache", TRANSACTIONAL_TTL);
pub const USER_CART_ITEMS: Keyspace = Keyspace::new("user-cart-items-cache", TRANSACTIONAL_TTL);

pub const ORDER: Keyspace = Keyspace::new("order-cache", TRANSACTIONAL_TTL);
pub const USER_ORDERS: Keyspace = Keyspace::new("user-orders-cache", TRANSACTIONAL_TTL);
pub const ORDER_ITEM: Keyspace = Keyspace::new("order-item-cache", TRANSACTIONAL_TTL);
pub const ORDER_ITEMS: Keyspace = Keyspace::new("order-items-cache", TRANSACTIONAL_TTL);

pub const PRODUCT: Keyspace = Keyspace::new("product-cache", CATALOG_TTL);
pub const PRODUCTS: Keyspace = Keyspace::new("products-cache", CATALOG_TTL);
pub const PRODUCT_CATEGORY: Keyspace = Keyspace::new("product-category-cache", CATALOG_TTL);
pub const PRODUCT_SUB_CATEGORY: Keyspace =
    Keyspace::new("product-sub-category-cache", CATALOG_TTL);
pub const HERO_PRODUCTS: Keyspace = Keyspace::new("hero-products-cache", CATALOG_TTL);
pub const CATEGORY_HERO_PRODUCTS: Keyspace =
    Keyspace::new("category-hero-products-cache", CATALOG_TTL);
pub const PRODUCT_SEARCH: Keyspace = Keyspace::new("product-search-cache", CATALOG_TTL);

pub const CATEGORY: Keyspace = Keyspace::new("category-cache", CATALOG_TTL);
pub const CATEGORIES: Keyspace = Keyspace::new("categories-cache", CATALOG_TTL);
pub const SUB_CATEGORY: Keyspace = Keyspace::new("sub-category-cache", CATALOG_TTL);
pub const SUB_CATEGORIES: Keyspace = Keyspace::new("sub-categories-cache", CATALOG_TTL);
pub const SUB_CATEGORIES_BY_CATEGORY: Keyspace =
    Keyspace::new("sub-categories-by-category-cache", CATALOG_TTL);

pub const USER: Keyspace = Keyspace::new("user-cache", TRANSACTIONAL_TTL);
pub const ADDRESS: Keyspace = Keyspace::new("address-cache", TRANSACTIONAL_TTL);
pub const USER_ADDRESSES: Keyspace = Keyspace::new("user-addresses-cache", TRANSACTIONAL_TTL);
