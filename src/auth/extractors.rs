use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use tracing::warn;

use super::{error::AuthError, verifier::TokenVerifier};

pub const BEARER_PREFIX: &str = "Bearer ";

/// Pulls the token out of an `Authorization: Bearer <token>` value.
///
/// The prefix is matched exactly (case and single space); surrounding
/// whitespace on the remainder is trimmed.
pub fn extract_bearer(header: &str) -> Result<String, AuthError> {
    let token = header
        .strip_prefix(BEARER_PREFIX)
        .ok_or(AuthError::HeaderFormat)?
        .trim();
    if token.is_empty() {
        return Err(AuthError::HeaderFormat);
    }
    Ok(token.to_owned())
}

/// Admits a request only if it presents a currently valid bearer token.
#[derive(Clone)]
pub struct AuthGuard {
    verifier: TokenVerifier,
}

impl AuthGuard {
    pub fn new(verifier: TokenVerifier) -> Self {
        Self { verifier }
    }

    /// Returns the raw token string on success.
    pub fn guard(&self, header: Option<&str>) -> Result<String, AuthError> {
        let header = header.ok_or(AuthError::MissingHeader)?;
        let token = extract_bearer(header)?;

        let verdict = self.verifier.verify(&token);
        match verdict.failure {
            None => Ok(token),
            Some(kind) => Err(AuthError::Token(kind)),
        }
    }
}

/// The verified bearer token of the current request.
#[derive(Debug)]
pub struct BearerToken(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
    AuthGuard: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let guard = AuthGuard::from_ref(state);

        parts
            .headers
            .get(AUTHORIZATION)
            .map(|v| v.to_str().map_err(|_| AuthError::HeaderFormat))
            .transpose()
            .and_then(|header| guard.guard(header))
            .map(BearerToken)
            .map_err(|e| {
                warn!(reason = %e, "request rejected by auth guard");
                e
            })
    }
}
