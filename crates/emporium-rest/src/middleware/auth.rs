//! Authentication middleware.

use crate::{responses::AppError, state::AppState};
use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, Request},
    middleware::Next,
    response::Response,
};
use emporium_core::EmporiumError;
use tracing::debug;

/// Rejects requests without the configured API key.
///
/// On success the [`emporium_security::Principal`] is added to the request
/// extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    match state.authenticator.authenticate(auth_header) {
        Ok(principal) => {
            request.extensions_mut().insert(principal);
            Ok(next.run(request).await)
        }
        Err(e) => {
            debug!("Authentication failed for {}: {}", request.uri().path(), e);
            Err(AppError(EmporiumError::from(e)))
        }
    }
}
