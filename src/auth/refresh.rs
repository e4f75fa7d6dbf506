use tracing::{error, info, warn};

use super::{
    decoder::TokenDecoder,
    error::TokenErrorKind,
    issuer::TokenIssuer,
    jwt::now_unix,
    token::TokenPair,
    verifier::{TokenVerifier, VerifyResult},
};

/// Rotates a token pair from a still-valid token.
///
/// Rotation does not revoke: the presented token stays valid until its own
/// expiry, and each call mints a new pair. Either an access or a refresh
/// token is accepted.
#[derive(Clone)]
pub struct RefreshOrchestrator {
    verifier: TokenVerifier,
    decoder: TokenDecoder,
    issuer: TokenIssuer,
}

impl RefreshOrchestrator {
    pub fn new(verifier: TokenVerifier, decoder: TokenDecoder, issuer: TokenIssuer) -> Self {
        Self {
            verifier,
            decoder,
            issuer,
        }
    }

    pub fn refresh(&self, old_token: &str) -> Result<TokenPair, VerifyResult> {
        self.refresh_at(old_token, now_unix())
    }

    pub fn refresh_at(&self, old_token: &str, now: i64) -> Result<TokenPair, VerifyResult> {
        let verdict = self.verifier.verify_at(old_token, now);
        if !verdict.valid {
            warn!(reason = %verdict.reason, "refresh rejected");
            return Err(verdict);
        }

        let claims = self.decoder.decode_token_at(old_token, now).into_claims()?;

        // Decoded claims always carry iat/exp, so issuance cannot see an empty set.
        let pair = self
            .issuer
            .issue_pair_at(&claims, now)
            .map_err(|e| {
                error!(error = %e, "reissue after refresh failed");
                VerifyResult::rejected(TokenErrorKind::Malformed)
            })?;
        info!(claims = claims.len(), "token pair rotated");
        Ok(pair)
    }
}
