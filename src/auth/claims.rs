//! Decoded identity claims.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Claims decoded from a verified credential.
///
/// The full payload is kept as-is so downstream handlers see exactly what
/// was signed. Accessors cover the registered claim names.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Claims(Map<String, Value>);

impl Claims {
    /// Look up any claim by name.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Subject (`sub`), when it is a string.
    pub fn subject(&self) -> Option<&str> {
        self.get("sub").and_then(Value::as_str)
    }

    /// Issuer (`iss`).
    pub fn issuer(&self) -> Option<&str> {
        self.get("iss").and_then(Value::as_str)
    }

    /// Issued-at (`iat`).
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        self.timestamp("iat")
    }

    /// Expiry (`exp`).
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.timestamp("exp")
    }

    /// Not-before (`nbf`).
    pub fn not_before(&self) -> Option<DateTime<Utc>> {
        self.timestamp("nbf")
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn timestamp(&self, key: &str) -> Option<DateTime<Utc>> {
        let value = self.get(key)?;
        let secs = value
            .as_i64()
            .or_else(|| value.as_f64().map(|f| f as i64))?;
        DateTime::from_timestamp(secs, 0)
    }
}
