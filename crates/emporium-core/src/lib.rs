//! # Emporium Core
//!
//! Core types, domain entities, and error definitions shared by every
//! Emporium crate: the store layer, the cache-aside services, and the
//! HTTP surface all speak in these types.

pub mod domain;
pub mod error;
pub mod id;
pub mod result;
pub mod validation;

pub use domain::*;
pub use error::*;
pub use id::*;
pub use result::*;
pub use validation::*;

// Re-export shaku for dependency injection
pub use shaku::Interface;
