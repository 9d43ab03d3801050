//! Gate configuration.

use std::fmt;

use http::HeaderName;
use jsonwebtoken::Algorithm;
use serde::{Deserialize, Serialize};

/// Default header carrying the credential.
pub const DEFAULT_HEADER_NAME: &str = "x-auth-token";

/// Default cookie consulted when the header is absent.
pub const DEFAULT_COOKIE_NAME: &str = "token";

/// Algorithms usable with a shared secret.
const HMAC_ALGORITHMS: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

/// Verification gate configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateConfig {
    /// Header checked first for the credential
    #[serde(default = "default_header_name")]
    pub header_name: String,
    /// Cookie checked when the header is absent
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    /// Pinned signing algorithms. The `alg` field of a credential must be one
    /// of these; it is never used to choose how to verify.
    #[serde(default = "default_algorithms")]
    pub algorithms: Vec<Algorithm>,
    /// Clock skew tolerated on `exp` and `nbf`, in seconds
    #[serde(default)]
    pub leeway_seconds: u64,
    /// Reject credentials that carry no `exp` claim. When unset, `exp` is
    /// still checked whenever it is present.
    #[serde(default)]
    pub require_exp: bool,
    /// Expected `iss` claim, if any
    #[serde(default)]
    pub issuer: Option<String>,
    /// Expected `aud` claim, if any
    #[serde(default)]
    pub audience: Option<String>,
}

fn default_header_name() -> String {
    DEFAULT_HEADER_NAME.to_string()
}

fn default_cookie_name() -> String {
    DEFAULT_COOKIE_NAME.to_string()
}

fn default_algorithms() -> Vec<Algorithm> {
    vec![Algorithm::HS256]
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            header_name: default_header_name(),
            cookie_name: default_cookie_name(),
            algorithms: default_algorithms(),
            leeway_seconds: 0,
            require_exp: false,
            issuer: None,
            audience: None,
        }
    }
}

impl GateConfig {
    /// Pin a different set of algorithms.
    pub fn with_algorithms(mut self, algorithms: Vec<Algorithm>) -> Self {
        self.algorithms = algorithms;
        self
    }

    /// Require a specific issuer and, optionally, audience.
    pub fn with_issuer(mut self, issuer: String, audience: Option<String>) -> Self {
        self.issuer = Some(issuer);
        self.audience = audience;
        self
    }

    /// Check the configuration and return the parsed header name.
    pub fn validate(&self) -> Result<HeaderName, ConfigError> {
        if self.algorithms.is_empty() {
            return Err(ConfigError::NoAlgorithms);
        }
        if let Some(alg) = self
            .algorithms
            .iter()
            .find(|alg| !HMAC_ALGORITHMS.contains(*alg))
        {
            return Err(ConfigError::UnsupportedAlgorithm(*alg));
        }

        let header_name = HeaderName::from_bytes(self.header_name.as_bytes())
            .map_err(|_| ConfigError::InvalidHeaderName(self.header_name.clone()))?;

        if !is_cookie_name(&self.cookie_name) {
            return Err(ConfigError::InvalidCookieName(self.cookie_name.clone()));
        }

        Ok(header_name)
    }
}

// RFC 6265 cookie-name is an RFC 7230 token.
fn is_cookie_name(name: &str) -> bool {
    !name.is_empty()
        && name.bytes().all(|b| {
            b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b)
        })
}

/// Startup-time configuration errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// No secret was provided
    MissingSecret,
    /// The secret is empty
    EmptySecret,
    /// The algorithm set is empty
    NoAlgorithms,
    /// Algorithm cannot be verified with a shared secret
    UnsupportedAlgorithm(Algorithm),
    /// Header name is not a valid HTTP header name
    InvalidHeaderName(String),
    /// Cookie name is not a valid cookie token
    InvalidCookieName(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSecret => write!(f, "Signing secret is not configured"),
            Self::EmptySecret => write!(f, "Signing secret must not be empty"),
            Self::NoAlgorithms => write!(f, "At least one signing algorithm must be pinned"),
            Self::UnsupportedAlgorithm(alg) => {
                write!(f, "Algorithm {:?} is not an HMAC algorithm", alg)
            }
            Self::InvalidHeaderName(name) => write!(f, "Invalid header name: {}", name),
            Self::InvalidCookieName(name) => write!(f, "Invalid cookie name: {}", name),
        }
    }
}

impl std::error::Error for ConfigError {}
