use std::str::FromStr;

use base64::{
    alphabet,
    engine::{
        general_purpose::{GeneralPurpose, GeneralPurposeConfig, URL_SAFE_NO_PAD},
        DecodePaddingMode,
    },
    Engine as _,
};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use time::OffsetDateTime;
use tracing::debug;

use super::{
    claims::ClaimSet,
    error::{AuthError, TokenErrorKind},
    token::Token,
};

// Signature segments only need to decode; their unused trailing bits are left
// to the signature comparison.
const SIGNATURE_B64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_allow_trailing_bits(true)
        .with_decode_padding_mode(DecodePaddingMode::RequireNone),
);

/// Current wall-clock time in Unix seconds.
pub fn now_unix() -> i64 {
    OffsetDateTime::now_utc().unix_timestamp()
}

/// Signs claim sets into tokens and classifies presented tokens.
///
/// Only HMAC algorithms are accepted. Time bounds are checked here rather
/// than by `jsonwebtoken` so that `exp == now` counts as expired and a future
/// `iat` is reported as immature.
#[derive(Clone)]
pub struct TokenCodec {
    algorithm: Algorithm,
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    pub fn new(secret: &[u8], algorithm: &str) -> Result<Self, AuthError> {
        let algorithm = hmac_algorithm(algorithm)?;

        let mut validation = Validation::new(algorithm);
        validation.required_spec_claims.clear();
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;

        Ok(Self {
            algorithm,
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        })
    }

    pub fn encode(&self, claims: &ClaimSet, ttl_secs: i64) -> Result<Token, AuthError> {
        self.encode_at(claims, ttl_secs, now_unix())
    }

    /// Signs `claims` as if issued at `now`.
    pub fn encode_at(&self, claims: &ClaimSet, ttl_secs: i64, now: i64) -> Result<Token, AuthError> {
        let payload = claims.stamped(now, now.saturating_add(ttl_secs));
        let token = encode(&Header::new(self.algorithm), &payload, &self.encoding)?;
        debug!(alg = ?self.algorithm, iat = now, ttl_secs, "jwt signed");
        Ok(Token::new(token))
    }

    pub fn decode(&self, token: &str) -> Result<ClaimSet, TokenErrorKind> {
        self.decode_at(token, now_unix())
    }

    /// Decodes `token` and checks its time window against `now`.
    pub fn decode_at(&self, token: &str, now: i64) -> Result<ClaimSet, TokenErrorKind> {
        check_structure(token)?;

        let claims = decode::<ClaimSet>(token, &self.decoding, &self.validation)
            .map_err(|e| classify(e.kind()))?
            .claims;

        let exp = claims.expires_at().ok_or(TokenErrorKind::Malformed)?;
        let iat = claims.issued_at().ok_or(TokenErrorKind::Malformed)?;

        if exp <= now {
            return Err(TokenErrorKind::Expired);
        }
        if iat > now {
            return Err(TokenErrorKind::Immature);
        }
        Ok(claims)
    }
}

fn hmac_algorithm(name: &str) -> Result<Algorithm, AuthError> {
    match Algorithm::from_str(name) {
        Ok(alg @ (Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512)) => Ok(alg),
        _ => Err(AuthError::UnsupportedAlgorithm(name.to_owned())),
    }
}

/// Structural check done before any cryptography: exactly three segments,
/// each one valid base64url. The signature is decoded leniently and compared
/// by `jsonwebtoken`, so an edited signature character that still decodes is
/// reported as a bad signature.
fn check_structure(token: &str) -> Result<(), TokenErrorKind> {
    let segments: Vec<&str> = token.split('.').collect();
    let [header, payload, signature] = segments.as_slice() else {
        return Err(TokenErrorKind::Malformed);
    };

    for segment in [header, payload] {
        URL_SAFE_NO_PAD
            .decode(segment)
            .map_err(|_| TokenErrorKind::Malformed)?;
    }

    if signature.is_empty() || SIGNATURE_B64.decode(signature).is_err() {
        return Err(TokenErrorKind::Malformed);
    }
    Ok(())
}

fn classify(kind: &ErrorKind) -> TokenErrorKind {
    match kind {
        ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
            TokenErrorKind::InvalidSignature
        }
        ErrorKind::ExpiredSignature => TokenErrorKind::Expired,
        ErrorKind::ImmatureSignature => TokenErrorKind::Immature,
        _ => TokenErrorKind::Malformed,
    }
}
