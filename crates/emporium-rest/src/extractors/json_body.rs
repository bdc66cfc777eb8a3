//! JSON body extractors.
//!
//! Field validation happens in the services; these extractors only decode.
//! A body that cannot be decoded is answered with 400 and code
//! `INVALID_JSON` instead of Axum's plain-text rejection.

use emporium_core::ErrorResponse;
use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{de::DeserializeOwned, Deserialize};

/// JSON extractor with an [`ErrorResponse`] rejection.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

/// Rejection returned when a body is not the expected JSON.
#[derive(Debug)]
pub struct InvalidJson(JsonRejection);

impl IntoResponse for InvalidJson {
    fn into_response(self) -> Response {
        let error_response = ErrorResponse {
            code: "INVALID_JSON".to_string(),
            message: format!("Invalid JSON: {}", self.0.body_text()),
            details: None,
            trace_id: None,
        };
        (StatusCode::BAD_REQUEST, Json(error_response)).into_response()
    }
}

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = InvalidJson;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(InvalidJson)?;
        Ok(Self(value))
    }
}

/// Body of the update endpoints: the row id next to the replacement fields.
///
/// ```json
/// { "id": 7, "product_id": 5, "quantity": 3, "user_id": "u-1" }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateRequest<I, T> {
    pub id: I,
    #[serde(flatten)]
    pub fields: T,
}
