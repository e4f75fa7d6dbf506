use std::{collections::HashMap, path::Path};

use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{claims::ClaimSet, password::verify_password};

/// A stored user with its argon2 password hash.
#[derive(Debug, Clone, Deserialize)]
pub struct UserRecord {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub password_hash: String,
}

/// Public identity of an authenticated user; this is what goes into tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserIdentity {
    pub id: i64,
    pub email: String,
    pub username: String,
}

impl From<&UserRecord> for UserIdentity {
    fn from(user: &UserRecord) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            username: user.username.clone(),
        }
    }
}

impl From<&UserIdentity> for ClaimSet {
    fn from(user: &UserIdentity) -> Self {
        ClaimSet::new()
            .with("id", user.id)
            .with("email", user.email.as_str())
            .with("username", user.username.as_str())
    }
}

/// Checks login credentials. Implemented by whatever owns user persistence.
#[async_trait]
pub trait CredentialChecker: Send + Sync {
    /// `Ok(None)` when the email is unknown or the password does not match.
    async fn check(&self, email: &str, password: &str) -> anyhow::Result<Option<UserIdentity>>;
}

/// In-memory user directory keyed by lowercased email.
#[derive(Debug, Clone, Default)]
pub struct UserDirectory {
    users: HashMap<String, UserRecord>,
}

impl UserDirectory {
    pub fn new(records: impl IntoIterator<Item = UserRecord>) -> Self {
        let users = records
            .into_iter()
            .map(|user| (user.email.trim().to_lowercase(), user))
            .collect();
        Self { users }
    }

    /// Parses a JSON array of user records.
    pub fn from_json(raw: &str) -> anyhow::Result<Self> {
        let records: Vec<UserRecord> =
            serde_json::from_str(raw).context("parse user directory")?;
        Ok(Self::new(records))
    }

    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("read user directory {}", path.display()))?;
        Self::from_json(&raw)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl CredentialChecker for UserDirectory {
    async fn check(&self, email: &str, password: &str) -> anyhow::Result<Option<UserIdentity>> {
        let Some(user) = self.users.get(&email.trim().to_lowercase()) else {
            debug!("credential check: unknown email");
            return Ok(None);
        };
        if !verify_password(password, &user.password_hash)? {
            debug!(user_id = user.id, "credential check: password mismatch");
            return Ok(None);
        }
        Ok(Some(UserIdentity::from(user)))
    }
}
