//! Result type alias for Emporium operations.

use crate::EmporiumError;

/// Result type used across every Emporium layer.
pub type EmporiumResult<T> = Result<T, EmporiumError>;
