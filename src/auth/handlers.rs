use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        claims::ClaimSet,
        dto::{AuthEnvelope, LoginRequest, LoginResponse, RefreshRequest},
        error::AuthError,
        extractors::BearerToken,
    },
    error::ApiError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/user/login", post(login))
        .route("/user/refresh", post(refresh))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/user/me", get(get_me))
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(ApiError::InvalidEmail);
    }

    let Some(user) = state
        .credentials
        .check(&payload.email, &payload.password)
        .await?
    else {
        warn!(email = %payload.email, "login rejected");
        return Err(ApiError::InvalidCredentials);
    };

    let auth = state.tokens.issuer.issue_pair(&ClaimSet::from(&user))?;

    info!(user_id = user.id, email = %user.email, "user logged in");
    Ok(Json(LoginResponse { user, auth }))
}

#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<AuthEnvelope>, ApiError> {
    let auth = state
        .tokens
        .refresher
        .refresh(&payload.token)
        .map_err(ApiError::RefreshRejected)?;
    Ok(Json(AuthEnvelope { auth }))
}

/// Identity carried by the presented access token.
#[instrument(skip(state, token))]
pub async fn get_me(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<Json<ClaimSet>, ApiError> {
    let decoded = state.tokens.decoder.decode_token(&token);
    if let Some(kind) = decoded.failure {
        // expired between the guard check and now
        return Err(AuthError::Token(kind).into());
    }
    Ok(Json(decoded.claims))
}
