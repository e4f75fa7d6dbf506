use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use super::{
    error::TokenErrorKind,
    jwt::{now_unix, TokenCodec},
};

pub const OK_REASON: &str = "OK";

/// Allow/deny outcome of a token check. Never carries claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerifyResult {
    pub valid: bool,
    pub reason: String,
    #[serde(skip)]
    pub failure: Option<TokenErrorKind>,
}

impl VerifyResult {
    pub fn ok() -> Self {
        Self {
            valid: true,
            reason: OK_REASON.to_owned(),
            failure: None,
        }
    }

    pub fn rejected(kind: TokenErrorKind) -> Self {
        Self {
            valid: false,
            reason: kind.message().to_owned(),
            failure: Some(kind),
        }
    }
}

impl From<Result<(), TokenErrorKind>> for VerifyResult {
    fn from(res: Result<(), TokenErrorKind>) -> Self {
        match res {
            Ok(()) => Self::ok(),
            Err(kind) => Self::rejected(kind),
        }
    }
}

#[derive(Clone)]
pub struct TokenVerifier {
    codec: Arc<TokenCodec>,
}

impl TokenVerifier {
    pub fn new(codec: Arc<TokenCodec>) -> Self {
        Self { codec }
    }

    pub fn verify(&self, token: &str) -> VerifyResult {
        self.verify_at(token, now_unix())
    }

    pub fn verify_at(&self, token: &str, now: i64) -> VerifyResult {
        let result = VerifyResult::from(self.codec.decode_at(token, now).map(|_| ()));
        debug!(valid = result.valid, reason = %result.reason, "jwt verified");
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::claims::ClaimSet;

    const T: i64 = 1_700_000_000;

    fn setup() -> (Arc<TokenCodec>, TokenVerifier) {
        let codec = Arc::new(TokenCodec::new(b"verifier-secret", "HS256").unwrap());
        (codec.clone(), TokenVerifier::new(codec))
    }

    fn claims() -> ClaimSet {
        ClaimSet::new().with("id", 7).with("email", "a@b.com")
    }

    #[test]
    fn fresh_token_is_valid() {
        let (codec, verifier) = setup();
        let token = codec.encode(&claims(), 3600).unwrap();
        assert_eq!(verifier.verify(token.as_str()), VerifyResult::ok());
    }

    #[test]
    fn expired_token_reports_expiry() {
        let (codec, verifier) = setup();
        // exp = T - 1
        let token = codec.encode_at(&claims(), -1, T).unwrap();

        let result = verifier.verify_at(token.as_str(), T);
        assert!(!result.valid);
        assert!(result.reason.contains("expired"));
        assert_eq!(result.failure, Some(TokenErrorKind::Expired));
    }

    #[test]
    fn each_failure_has_its_own_reason() {
        let (codec, verifier) = setup();
        let fresh = codec.encode_at(&claims(), 60, T).unwrap();
        let future = codec.encode_at(&claims(), 60, T + 60).unwrap();
        let (signed, _) = fresh.as_str().rsplit_once('.').unwrap();
        let forged = format!("{signed}.AAAA");

        let cases = [
            ("not-a-token", TokenErrorKind::Malformed),
            (forged.as_str(), TokenErrorKind::InvalidSignature),
            (future.as_str(), TokenErrorKind::Immature),
        ];
        for (token, kind) in cases {
            let result = verifier.verify_at(token, T);
            assert_eq!(result, VerifyResult::rejected(kind));
            assert_eq!(result.reason, kind.message());
        }
    }

    #[test]
    fn serializes_without_failure_tag() {
        let json = serde_json::to_value(VerifyResult::rejected(TokenErrorKind::Expired)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"valid": false, "reason": "token has expired"})
        );
    }
}
