//! Outcome value returned by update and delete endpoints.

use serde::{Deserialize, Serialize};

/// Result of a mutation, serialized as `{ "status": "success" }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RequestStatus {
    pub status: Outcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Success,
    Failed,
}

impl RequestStatus {
    #[must_use]
    pub const fn success() -> Self {
        Self {
            status: Outcome::Success,
        }
    }

    #[must_use]
    pub const fn failed() -> Self {
        Self {
            status: Outcome::Failed,
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self.status, Outcome::Success)
    }
}
