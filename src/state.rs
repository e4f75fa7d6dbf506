use std::sync::Arc;

use anyhow::Context;
use axum::extract::FromRef;

use crate::{
    auth::{
        extractors::AuthGuard,
        repo::{CredentialChecker, UserDirectory},
        services::TokenService,
    },
    config::AppConfig,
};

#[derive(Clone)]
pub struct AppState {
    pub tokens: TokenService,
    pub credentials: Arc<dyn CredentialChecker>,
}

impl AppState {
    pub fn init(config: AppConfig) -> anyhow::Result<Self> {
        let directory = match &config.users_file {
            Some(path) => UserDirectory::from_json_file(path)?,
            None => {
                tracing::warn!("USERS_FILE not set; every login will be rejected");
                UserDirectory::default()
            }
        };
        tracing::info!(users = directory.len(), "user directory loaded");

        Self::from_parts(&config, Arc::new(directory))
    }

    pub fn from_parts(
        config: &AppConfig,
        credentials: Arc<dyn CredentialChecker>,
    ) -> anyhow::Result<Self> {
        let tokens = TokenService::from_config(&config.jwt).context("build token service")?;
        Ok(Self {
            tokens,
            credentials,
        })
    }
}

impl FromRef<AppState> for AuthGuard {
    fn from_ref(state: &AppState) -> Self {
        state.tokens.guard.clone()
    }
}
