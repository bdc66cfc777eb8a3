//! REST API controllers.

pub mod cart_controller;
pub mod category_controller;
pub mod health_controller;
pub mod order_controller;
pub mod product_controller;
pub mod user_controller;

pub use health_controller::*;
