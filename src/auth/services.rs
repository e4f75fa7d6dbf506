use std::sync::Arc;

use super::{
    decoder::TokenDecoder,
    error::AuthError,
    extractors::AuthGuard,
    issuer::TokenIssuer,
    jwt::TokenCodec,
    refresh::RefreshOrchestrator,
    verifier::TokenVerifier,
};
use crate::config::JwtConfig;

/// All token components built over one shared codec.
#[derive(Clone)]
pub struct TokenService {
    pub issuer: TokenIssuer,
    pub verifier: TokenVerifier,
    pub decoder: TokenDecoder,
    pub refresher: RefreshOrchestrator,
    pub guard: AuthGuard,
}

impl TokenService {
    pub fn from_config(cfg: &JwtConfig) -> Result<Self, AuthError> {
        let codec = Arc::new(TokenCodec::new(cfg.secret.as_bytes(), &cfg.algorithm)?);

        let issuer = TokenIssuer::new(codec.clone(), cfg.access_ttl(), cfg.refresh_ttl());
        let verifier = TokenVerifier::new(codec.clone());
        let decoder = TokenDecoder::new(codec);
        let refresher = RefreshOrchestrator::new(verifier.clone(), decoder.clone(), issuer.clone());
        let guard = AuthGuard::new(verifier.clone());

        Ok(Self {
            issuer,
            verifier,
            decoder,
            refresher,
            guard,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::claims::ClaimSet;

    fn jwt_config(algorithm: &str) -> JwtConfig {
        JwtConfig {
            secret: "service-secret".into(),
            algorithm: algorithm.into(),
            access_ttl_minutes: 5,
            refresh_ttl_minutes: 60,
        }
    }

    #[test]
    fn components_share_the_configured_key() {
        let service = TokenService::from_config(&jwt_config("HS512")).unwrap();
        let claims = ClaimSet::new().with("id", 7).with("email", "a@b.com");

        let pair = service.issuer.issue_pair(&claims).unwrap();
        assert!(service.verifier.verify(pair.access.as_str()).valid);
        assert!(service.decoder.decode_token(pair.refresh.as_str()).ok);

        let header = format!("Bearer {}", pair.access);
        assert_eq!(service.guard.guard(Some(&header)).unwrap(), pair.access.as_str());

        let rotated = service.refresher.refresh(pair.refresh.as_str()).unwrap();
        let decoded = service.decoder.decode_token(rotated.access.as_str());
        assert_eq!(decoded.claims.get("email"), claims.get("email"));
    }

    #[test]
    fn asymmetric_algorithm_is_refused() {
        assert!(matches!(
            TokenService::from_config(&jwt_config("RS256")),
            Err(AuthError::UnsupportedAlgorithm(alg)) if alg == "RS256"
        ));
    }

    #[test]
    fn zero_access_ttl_yields_expired_tokens() {
        let mut cfg = jwt_config("HS256");
        cfg.access_ttl_minutes = 0;
        let service = TokenService::from_config(&cfg).unwrap();

        let token = service
            .issuer
            .issue_access(&ClaimSet::new().with("id", 1))
            .unwrap();
        let verdict = service.verifier.verify(token.as_str());
        assert!(!verdict.valid);
        assert!(verdict.reason.contains("expired"));
    }
}
