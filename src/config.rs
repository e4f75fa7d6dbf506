use std::{fmt, net::SocketAddr, path::PathBuf};

use anyhow::{bail, Context};
use time::Duration;

#[derive(Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub algorithm: String,
    pub access_ttl_minutes: i64,
    pub refresh_ttl_minutes: i64,
}

impl JwtConfig {
    pub fn access_ttl(&self) -> Duration {
        Duration::minutes(self.access_ttl_minutes)
    }

    pub fn refresh_ttl(&self) -> Duration {
        Duration::minutes(self.refresh_ttl_minutes)
    }
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("algorithm", &self.algorithm)
            .field("access_ttl_minutes", &self.access_ttl_minutes)
            .field("refresh_ttl_minutes", &self.refresh_ttl_minutes)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub jwt: JwtConfig,
    /// JSON file with the user directory; empty directory when unset.
    pub users_file: Option<PathBuf>,
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let secret = std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?;
        if secret.is_empty() {
            bail!("JWT_SECRET must not be empty");
        }

        let jwt = JwtConfig {
            secret,
            algorithm: std::env::var("JWT_ALGORITHM").unwrap_or_else(|_| "HS256".into()),
            access_ttl_minutes: env_or("JWT_ACCESS_TTL_MINUTES", 60)?,
            refresh_ttl_minutes: env_or("JWT_REFRESH_TTL_MINUTES", 60 * 24 * 14)?,
        };

        Ok(Self {
            jwt,
            users_file: std::env::var_os("USERS_FILE").map(PathBuf::from),
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env_or("APP_PORT", 8080)?,
        })
    }

    pub fn bind_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))
    }
}

fn env_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value: {raw:?}")),
        Err(_) => Ok(default),
    }
}
