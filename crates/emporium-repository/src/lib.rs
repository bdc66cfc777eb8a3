//! # Emporium Repository
//!
//! Entity stores: one trait per table family and a PostgreSQL
//! implementation of each, wired as shaku components.
//!
//! ```text
//! Service
//!   ↓  Arc<dyn CartItemRepository>   (store interface)
//! PgCartItemRepository               (SQLx / PostgreSQL)
//!   ↓  Arc<dyn DatabasePoolInterface>
//! PostgreSQL
//! ```
//!
//! Reads return `Option`/`Vec` and leave "not found" policy to the caller.
//! Updates and deletes return the row as it was before the mutation so the
//! caller can invalidate the cache entries keyed by its old parent.
//!
//! With the `testing` feature, [`memory::InMemoryStore`] implements every
//! store trait over plain collections.

pub mod pool;
pub mod postgres;
pub mod traits;

#[cfg(any(test, feature = "testing"))]
pub mod memory;

pub use pool::*;
pub use postgres::*;
pub use traits::*;
