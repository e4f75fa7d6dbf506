use std::fmt;

use serde::{Deserialize, Serialize};

/// A signed `header.payload.signature` token string.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    pub(crate) fn new(raw: String) -> Self {
        Self(raw)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Keep bearer credentials out of debug logs.
impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(..)")
    }
}

/// Access and refresh tokens minted from the same claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenPair {
    #[serde(rename = "token")]
    pub access: Token,
    pub refresh: Token,
}
