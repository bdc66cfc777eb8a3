//! PostgreSQL implementations of the entity stores.

mod address_repository;
mod cart_item_repository;
mod category_repository;
mod order_item_repository;
mod order_repository;
mod product_repository;
mod user_repository;

pub use address_repository::PgAddressRepository;
pub use cart_item_repository::PgCartItemRepository;
pub use category_repository::PgCategoryRepository;
pub use order_item_repository::PgOrderItemRepository;
pub use order_repository::PgOrderRepository;
pub use product_repository::PgProductRepository;
pub use user_repository::PgUserRepository;
