use std::sync::Arc;

use time::Duration;
use tracing::debug;

use super::{
    claims::ClaimSet,
    error::AuthError,
    jwt::{now_unix, TokenCodec},
    token::{Token, TokenPair},
};

/// Mints access and refresh tokens with their configured lifetimes.
///
/// The issuer does not require the refresh TTL to exceed the access TTL.
#[derive(Clone)]
pub struct TokenIssuer {
    codec: Arc<TokenCodec>,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenIssuer {
    pub fn new(codec: Arc<TokenCodec>, access_ttl: Duration, refresh_ttl: Duration) -> Self {
        Self {
            codec,
            access_ttl,
            refresh_ttl,
        }
    }

    pub fn issue_access(&self, claims: &ClaimSet) -> Result<Token, AuthError> {
        self.issue(claims, self.access_ttl, now_unix())
    }

    pub fn issue_refresh(&self, claims: &ClaimSet) -> Result<Token, AuthError> {
        self.issue(claims, self.refresh_ttl, now_unix())
    }

    /// Issues both tokens against a single clock reading.
    pub fn issue_pair(&self, claims: &ClaimSet) -> Result<TokenPair, AuthError> {
        self.issue_pair_at(claims, now_unix())
    }

    pub fn issue_pair_at(&self, claims: &ClaimSet, now: i64) -> Result<TokenPair, AuthError> {
        Ok(TokenPair {
            access: self.issue(claims, self.access_ttl, now)?,
            refresh: self.issue(claims, self.refresh_ttl, now)?,
        })
    }

    fn issue(&self, claims: &ClaimSet, ttl: Duration, now: i64) -> Result<Token, AuthError> {
        if claims.is_empty() {
            return Err(AuthError::EmptyClaims);
        }
        let token = self.codec.encode_at(claims, ttl.whole_seconds(), now)?;
        debug!(claims = claims.len(), ttl_secs = ttl.whole_seconds(), "token issued");
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T: i64 = 1_700_000_000;

    fn issuer() -> (Arc<TokenCodec>, TokenIssuer) {
        let codec = Arc::new(TokenCodec::new(b"issuer-secret", "HS256").unwrap());
        let issuer = TokenIssuer::new(codec.clone(), Duration::minutes(5), Duration::hours(1));
        (codec, issuer)
    }

    fn claims() -> ClaimSet {
        ClaimSet::new().with("id", 3).with("username", "freddy")
    }

    #[test]
    fn empty_claims_are_rejected() {
        let (_, issuer) = issuer();
        assert!(matches!(
            issuer.issue_access(&ClaimSet::new()),
            Err(AuthError::EmptyClaims)
        ));
        assert!(matches!(
            issuer.issue_refresh(&ClaimSet::new()),
            Err(AuthError::EmptyClaims)
        ));
        assert!(matches!(
            issuer.issue_pair(&ClaimSet::new()),
            Err(AuthError::EmptyClaims)
        ));
    }

    #[test]
    fn access_and_refresh_differ_only_in_expiry() {
        let (codec, issuer) = issuer();
        let pair = issuer.issue_pair_at(&claims(), T).unwrap();
        assert_ne!(pair.access, pair.refresh);

        let mut access = codec.decode_at(pair.access.as_str(), T).unwrap();
        let mut refresh = codec.decode_at(pair.refresh.as_str(), T).unwrap();
        assert_eq!(access.expires_at(), Some(T + 300));
        assert_eq!(refresh.expires_at(), Some(T + 3600));

        access.remove("exp");
        refresh.remove("exp");
        assert_eq!(access, refresh);
        assert_eq!(access, claims().with("iat", T));
    }

    #[test]
    fn wall_clock_tokens_decode_to_same_claims() {
        let (codec, issuer) = issuer();
        let access = issuer.issue_access(&claims()).unwrap();
        let refresh = issuer.issue_refresh(&claims()).unwrap();

        for token in [access, refresh] {
            let decoded = codec.decode(token.as_str()).unwrap();
            assert_eq!(decoded.get("username"), claims().get("username"));
            assert_eq!(decoded.get("id"), claims().get("id"));
        }
    }

    #[test]
    fn relative_ttl_ordering_is_not_enforced() {
        let codec = Arc::new(TokenCodec::new(b"issuer-secret", "HS256").unwrap());
        let issuer = TokenIssuer::new(codec, Duration::hours(2), Duration::minutes(1));
        assert!(issuer.issue_pair(&claims()).is_ok());
    }
}
