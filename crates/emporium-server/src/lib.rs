//! # Emporium Server Library
//!
//! Dependency injection wiring, telemetry setup and startup helpers for
//! the Emporium server binary.

pub mod di;
pub mod startup;
pub mod telemetry;
