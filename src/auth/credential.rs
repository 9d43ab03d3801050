//! Credential extraction from request headers.

use std::fmt;

use http::{HeaderMap, HeaderName, header::COOKIE};
use serde::Serialize;

use crate::auth::error::AuthError;

/// Where the credential was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialSource {
    Header,
    Cookie,
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Header => write!(f, "header"),
            Self::Cookie => write!(f, "cookie"),
        }
    }
}

/// Raw credential taken from a request. Lives for one request only.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    token: String,
    source: CredentialSource,
}

impl Credential {
    pub fn as_str(&self) -> &str {
        &self.token
    }

    pub fn source(&self) -> CredentialSource {
        self.source
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("token", &"<redacted>")
            .field("source", &self.source)
            .finish()
    }
}

/// Find the candidate credential: header first, cookie as fallback.
///
/// Empty values count as absent. A header value that is not visible ASCII is
/// a present-but-invalid credential.
pub fn extract_credential(
    headers: &HeaderMap,
    header_name: &HeaderName,
    cookie_name: &str,
) -> Result<Option<Credential>, AuthError> {
    if let Some(value) = headers.get(header_name) {
        let token = value
            .to_str()
            .map_err(|_| AuthError::invalid("credential header is not visible ASCII"))?;
        if !token.is_empty() {
            return Ok(Some(Credential {
                token: token.to_string(),
                source: CredentialSource::Header,
            }));
        }
    }

    Ok(find_cookie(headers, cookie_name).map(|token| Credential {
        token,
        source: CredentialSource::Cookie,
    }))
}

// Values are taken verbatim, without percent-decoding. Compact JWTs use only
// the base64url alphabet and '.', so they never need it.
fn find_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| key.trim() == name)
        .map(|(_, value)| strip_quotes(value.trim()).to_string())
        .filter(|value| !value.is_empty())
}

fn strip_quotes(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}
