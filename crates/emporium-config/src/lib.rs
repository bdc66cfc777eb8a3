//! # Emporium Config
//!
//! Layered configuration for Emporium: TOML files, `.env`, then
//! `EMPORIUM__SECTION__KEY` environment variables, validated at load time.

mod app_config;
mod loader;
mod validation;

pub use app_config::*;
pub use loader::*;
pub use validation::*;
