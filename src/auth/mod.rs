//! Stateless bearer-token authentication: token issuance, verification,
//! decoding, refresh rotation and the request guard.

use crate::state::AppState;
use axum::Router;

pub mod claims;
pub mod decoder;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod issuer;
pub mod jwt;
pub mod password;
pub mod refresh;
pub mod repo;
pub mod services;
pub mod token;
pub mod verifier;

pub use claims::{ClaimSet, ClaimValue};
pub use decoder::{DecodeResult, TokenDecoder};
pub use error::{AuthError, TokenErrorKind};
pub use extractors::{extract_bearer, AuthGuard, BearerToken};
pub use issuer::TokenIssuer;
pub use jwt::TokenCodec;
pub use refresh::RefreshOrchestrator;
pub use services::TokenService;
pub use token::{Token, TokenPair};
pub use verifier::{TokenVerifier, VerifyResult};

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::auth_routes())
        .merge(handlers::me_routes())
}
