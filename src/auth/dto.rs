use serde::{Deserialize, Serialize};

use super::{repo::UserIdentity, token::TokenPair};

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for token refresh.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub token: String,
}

/// `{"auth": {"token": ..., "refresh": ...}}`
#[derive(Debug, Serialize)]
pub struct AuthEnvelope {
    pub auth: TokenPair,
}

/// Login response: the user's public fields next to the token pair.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub user: UserIdentity,
    pub auth: TokenPair,
}

/// Error body returned on every failed request.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageBody {
    pub message: String,
}

impl MessageBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
