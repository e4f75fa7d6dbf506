//! HTTP mapping for failures surfaced by the auth routes and the guard.

use axum::{
    http::{header::WWW_AUTHENTICATE, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

use crate::auth::{dto::MessageBody, error::AuthError, verifier::VerifyResult};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Invalid email")]
    InvalidEmail,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("{}", .0.reason)]
    RefreshRejected(VerifyResult),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        if self.is_unauthorized() {
            let mut res = (
                StatusCode::UNAUTHORIZED,
                Json(MessageBody::new(self.to_string())),
            )
                .into_response();
            res.headers_mut()
                .insert(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
            return res;
        }

        error!(error = %self, "token service failure");
        internal_error()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Auth(e) => e.into_response(),
            Self::InvalidEmail | Self::RefreshRejected(_) => {
                (StatusCode::BAD_REQUEST, Json(MessageBody::new(self.to_string()))).into_response()
            }
            Self::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, Json(MessageBody::new(self.to_string()))).into_response()
            }
            Self::Internal(e) => {
                error!(error = %e, "request failed");
                internal_error()
            }
        }
    }
}

fn internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(MessageBody::new("internal server error")),
    )
        .into_response()
}
