//! Shared secret used to verify credential signatures.

use std::fmt;

use crate::auth::config::ConfigError;

/// HMAC key material loaded once at startup.
///
/// The bytes are never printed: `Debug` is redacted and there is no
/// `Display` or `Serialize` implementation.
#[derive(Clone)]
pub struct SigningSecret(Vec<u8>);

impl SigningSecret {
    /// Wrap raw key material. An empty secret is a configuration error.
    pub fn new(value: impl Into<Vec<u8>>) -> Result<Self, ConfigError> {
        let bytes = value.into();
        if bytes.is_empty() {
            return Err(ConfigError::EmptySecret);
        }
        Ok(Self(bytes))
    }

    /// Length of the key material in bytes.
    pub fn byte_len(&self) -> usize {
        self.0.len()
    }

    pub(crate) fn expose(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningSecret(<redacted>)")
    }
}
