//! # Emporium Security
//!
//! Shared-secret authentication for the Emporium HTTP surface. Callers
//! present `Authorization: Bearer <key>`; a match yields a [`Principal`].

pub mod api_key;

pub use api_key::*;
