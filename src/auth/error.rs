use thiserror::Error;

/// Why a presented token was rejected.
///
/// Variants are listed in the order the codec checks them: structure first,
/// then signature, then the time window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenErrorKind {
    Malformed,
    InvalidSignature,
    Expired,
    Immature,
}

impl TokenErrorKind {
    /// Human-readable reason reported to clients and logs.
    pub fn message(self) -> &'static str {
        match self {
            Self::Malformed => "token is malformed",
            Self::InvalidSignature => "token signature is invalid",
            Self::Expired => "token has expired",
            Self::Immature => "token was issued in the future",
        }
    }
}

impl std::fmt::Display for TokenErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("cannot issue a token for an empty claim set")]
    EmptyClaims,

    #[error("missing Authorization header")]
    MissingHeader,

    #[error("invalid Authorization header, expected `Bearer <token>`")]
    HeaderFormat,

    #[error("invalid token: {0}")]
    Token(TokenErrorKind),

    #[error("unsupported signing algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("failed to sign token: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

impl AuthError {
    /// Credential problems are always an authorization failure, never a server fault.
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            Self::MissingHeader | Self::HeaderFormat | Self::Token(_)
        )
    }
}

impl From<TokenErrorKind> for AuthError {
    fn from(kind: TokenErrorKind) -> Self {
        Self::Token(kind)
    }
}
