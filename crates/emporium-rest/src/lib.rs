//! # Emporium REST
//!
//! REST API layer using Axum. Entity routes live under `/api/v1` behind the
//! API key middleware; health, info, docs and metrics routes are public.

pub mod controllers;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod responses;
pub mod router;
pub mod state;

pub use router::*;
pub use state::*;
