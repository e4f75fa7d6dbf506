use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use super::{
    claims::ClaimSet,
    error::TokenErrorKind,
    jwt::{now_unix, TokenCodec},
    verifier::{VerifyResult, OK_REASON},
};

/// Outcome of recovering the identity embedded in a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodeResult {
    pub ok: bool,
    pub claims: ClaimSet,
    pub reason: String,
    #[serde(skip)]
    pub failure: Option<TokenErrorKind>,
}

impl DecodeResult {
    pub fn decoded(claims: ClaimSet) -> Self {
        Self {
            ok: true,
            claims,
            reason: OK_REASON.to_owned(),
            failure: None,
        }
    }

    pub fn rejected(kind: TokenErrorKind) -> Self {
        Self {
            ok: false,
            claims: ClaimSet::new(),
            reason: kind.message().to_owned(),
            failure: Some(kind),
        }
    }

    /// The claims on success, or the equivalent verify failure.
    pub fn into_claims(self) -> Result<ClaimSet, VerifyResult> {
        match self.failure {
            None => Ok(self.claims),
            Some(kind) => Err(VerifyResult::rejected(kind)),
        }
    }
}

#[derive(Clone)]
pub struct TokenDecoder {
    codec: Arc<TokenCodec>,
}

impl TokenDecoder {
    pub fn new(codec: Arc<TokenCodec>) -> Self {
        Self { codec }
    }

    pub fn decode_token(&self, token: &str) -> DecodeResult {
        self.decode_token_at(token, now_unix())
    }

    pub fn decode_token_at(&self, token: &str, now: i64) -> DecodeResult {
        match self.codec.decode_at(token, now) {
            Ok(claims) => {
                debug!(claims = claims.len(), "jwt decoded");
                DecodeResult::decoded(claims)
            }
            Err(kind) => {
                debug!(reason = %kind, "jwt decode rejected");
                DecodeResult::rejected(kind)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T: i64 = 1_700_000_000;

    fn setup() -> (Arc<TokenCodec>, TokenDecoder) {
        let codec = Arc::new(TokenCodec::new(b"decoder-secret", "HS256").unwrap());
        (codec.clone(), TokenDecoder::new(codec))
    }

    #[test]
    fn decodes_issued_claims_with_time_bounds() {
        let (codec, decoder) = setup();
        let claims = ClaimSet::new().with("id", 7).with("email", "a@b.com");
        let token = codec.encode_at(&claims, 3600, T).unwrap();

        let result = decoder.decode_token_at(token.as_str(), T);
        assert!(result.ok);
        assert_eq!(result.reason, "OK");
        assert_eq!(
            serde_json::to_value(&result.claims).unwrap(),
            serde_json::json!({"id": 7, "email": "a@b.com", "iat": T, "exp": T + 3600})
        );
    }

    #[test]
    fn failures_carry_empty_claims() {
        let (codec, decoder) = setup();
        let claims = ClaimSet::new().with("id", 1);
        let expired = codec.encode_at(&claims, 10, T - 20).unwrap();

        let result = decoder.decode_token_at(expired.as_str(), T);
        assert!(!result.ok);
        assert!(result.claims.is_empty());
        assert_eq!(result.failure, Some(TokenErrorKind::Expired));

        let result = decoder.decode_token("garbage");
        assert!(!result.ok);
        assert!(result.claims.is_empty());
        assert_eq!(result.reason, TokenErrorKind::Malformed.message());
    }

    #[test]
    fn into_claims_maps_failure_to_verify_result() {
        let rejected = DecodeResult::rejected(TokenErrorKind::InvalidSignature);
        assert_eq!(
            rejected.into_claims(),
            Err(VerifyResult::rejected(TokenErrorKind::InvalidSignature))
        );

        let claims = ClaimSet::new().with("id", 2);
        assert_eq!(DecodeResult::decoded(claims.clone()).into_claims(), Ok(claims));
    }
}
