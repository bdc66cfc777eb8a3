//! # Emporium Service
//!
//! Cache-aside services over the entity stores.
//!
//! Every read goes through a [`CacheAsideReader`]: a cache hit is returned
//! as is, a miss is served by the store and cached in the background. Every
//! successful mutation hands the stale keys to a [`CacheAsideInvalidator`].
//! Input is validated before any store or cache call.

pub mod address_service;
pub mod cache;
pub mod cache_aside;
pub mod cart_service;
pub mod category_service;
pub mod metrics;
pub mod order_service;
pub mod product_service;
pub mod user_service;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use address_service::*;
pub use cache::*;
pub use cache_aside::*;
pub use cart_service::*;
pub use category_service::*;
pub use order_service::*;
pub use product_service::*;
pub use user_service::*;
