use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Reserved claim holding the issue instant (Unix seconds).
pub const ISSUED_AT: &str = "iat";
/// Reserved claim holding the expiry instant (Unix seconds).
pub const EXPIRES_AT: &str = "exp";

/// A single primitive claim value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClaimValue {
    Bool(bool),
    Int(i64),
    Str(String),
}

impl ClaimValue {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<bool> for ClaimValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for ClaimValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for ClaimValue {
    fn from(v: i32) -> Self {
        Self::Int(v.into())
    }
}

impl From<String> for ClaimValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<&str> for ClaimValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_owned())
    }
}

/// Identity attributes embedded in a token payload.
///
/// Keys are kept sorted so the serialized payload is deterministic for a
/// given set of claims.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClaimSet(BTreeMap<String, ClaimValue>);

impl ClaimSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ClaimValue>) -> Option<ClaimValue> {
        self.0.insert(key.into(), value.into())
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ClaimValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&ClaimValue> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<ClaimValue> {
        self.0.remove(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn issued_at(&self) -> Option<i64> {
        self.get(ISSUED_AT).and_then(ClaimValue::as_i64)
    }

    pub fn expires_at(&self) -> Option<i64> {
        self.get(EXPIRES_AT).and_then(ClaimValue::as_i64)
    }

    /// Copy of the claims with the reserved time claims stamped in.
    /// Caller-supplied `iat`/`exp` are overwritten.
    pub(crate) fn stamped(&self, issued_at: i64, expires_at: i64) -> Self {
        let mut claims = self.clone();
        claims.insert(ISSUED_AT, issued_at);
        claims.insert(EXPIRES_AT, expires_at);
        claims
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_flat_json_object() {
        let claims = ClaimSet::new()
            .with("id", 7)
            .with("email", "a@b.com")
            .with("admin", false);
        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": 7, "email": "a@b.com", "admin": false})
        );
    }

    #[test]
    fn rejects_non_primitive_values() {
        let nested = serde_json::json!({"id": 1, "roles": ["admin"]});
        assert!(serde_json::from_value::<ClaimSet>(nested).is_err());

        let float = serde_json::json!({"score": 1.5});
        assert!(serde_json::from_value::<ClaimSet>(float).is_err());
    }

    #[test]
    fn stamping_overwrites_reserved_keys_without_touching_original() {
        let claims = ClaimSet::new().with("id", 1).with("exp", "later");
        let stamped = claims.stamped(100, 160);

        assert_eq!(stamped.issued_at(), Some(100));
        assert_eq!(stamped.expires_at(), Some(160));
        assert_eq!(stamped.get("id"), Some(&ClaimValue::Int(1)));
        assert_eq!(claims.get("exp"), Some(&ClaimValue::Str("later".into())));
        assert!(!claims.contains_key("iat"));
    }
}
