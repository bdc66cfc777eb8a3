//! Bearer API key authentication.

use emporium_config::SecurityConfig;
use emporium_core::{EmporiumError, Interface};
use shaku::Component;
use thiserror::Error;
use tracing::debug;

const BEARER_PREFIX: &str = "Bearer ";

/// Proof that a request carried the configured API key.
///
/// Carries no identity: every key holder is the same caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal;

/// Reasons a request is refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("missing Authorization header")]
    MissingCredentials,

    #[error("Authorization header is not a bearer credential")]
    MalformedCredentials,

    #[error("invalid API key")]
    InvalidKey,
}

impl From<AuthError> for EmporiumError {
    fn from(err: AuthError) -> Self {
        Self::Unauthorized(err.to_string())
    }
}

/// Interface for request authentication.
pub trait AuthenticatorInterface: Interface + Send + Sync {
    /// Checks the raw `Authorization` header value of a request.
    fn authenticate(&self, authorization: Option<&str>) -> Result<Principal, AuthError>;
}

/// Compares bearer credentials against one shared API key.
#[derive(Component, Clone)]
#[shaku(interface = AuthenticatorInterface)]
pub struct ApiKeyAuthenticator {
    api_key: String,
}

impl ApiKeyAuthenticator {
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }

    #[must_use]
    pub fn from_config(config: &SecurityConfig) -> Self {
        Self::new(config.api_key.clone())
    }

    /// Returns the configured key, for building the DI module parameters.
    #[must_use]
    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

impl AuthenticatorInterface for ApiKeyAuthenticator {
    fn authenticate(&self, authorization: Option<&str>) -> Result<Principal, AuthError> {
        let header = authorization.ok_or(AuthError::MissingCredentials)?;
        let presented = header
            .strip_prefix(BEARER_PREFIX)
            .map(str::trim)
            .ok_or(AuthError::MalformedCredentials)?;

        // An unset key must not match an empty credential
        if self.api_key.is_empty() || !constant_time_eq(presented.as_bytes(), self.api_key.as_bytes())
        {
            debug!("API key rejected");
            return Err(AuthError::InvalidKey);
        }

        Ok(Principal)
    }
}

impl std::fmt::Debug for ApiKeyAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeyAuthenticator").finish_non_exhaustive()
    }
}

/// Byte comparison whose running time depends only on the lengths.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (left, right) in a.iter().zip(b.iter()) {
        diff |= left ^ right;
    }
    diff == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn authenticator() -> ApiKeyAuthenticator {
        ApiKeyAuthenticator::new("s3cret-key-for-tests")
    }

    #[test]
    fn test_matching_key_authenticates() {
        let auth = authenticator();
        assert_eq!(
            auth.authenticate(Some("Bearer s3cret-key-for-tests")),
            Ok(Principal)
        );
    }

    #[test]
    fn test_rejections() {
        let auth = authenticator();
        assert_eq!(auth.authenticate(None), Err(AuthError::MissingCredentials));
        assert_eq!(
            auth.authenticate(Some("Basic czNjcmV0")),
            Err(AuthError::MalformedCredentials)
        );
        assert_eq!(
            auth.authenticate(Some("Bearer s3cret-key-for-test")),
            Err(AuthError::InvalidKey)
        );
        assert_eq!(
            auth.authenticate(Some("Bearer S3CRET-KEY-FOR-TESTS")),
            Err(AuthError::InvalidKey)
        );
    }

    #[test]
    fn test_empty_key_never_matches() {
        let auth = ApiKeyAuthenticator::new("");
        assert_eq!(auth.authenticate(Some("Bearer ")), Err(AuthError::InvalidKey));
    }

    #[test]
    fn test_from_config_and_error_mapping() {
        let config = SecurityConfig {
            api_key: "from-config-key-0123".to_string(),
        };
        let auth = ApiKeyAuthenticator::from_config(&config);
        assert_eq!(auth.api_key(), "from-config-key-0123");
        assert!(!format!("{auth:?}").contains("from-config"));

        let err: EmporiumError = AuthError::InvalidKey.into();
        assert_eq!(err.status_code(), 401);
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"abc", b"abc"));
        assert!(!constant_time_eq(b"abc", b"abd"));
        assert!(!constant_time_eq(b"abc", b"abcd"));
        assert!(constant_time_eq(b"", b""));
    }
}
