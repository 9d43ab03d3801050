//! The verification gate: extract, verify, admit or reject.

use std::fmt;

use http::{HeaderMap, HeaderName};
use jsonwebtoken::{DecodingKey, Validation, decode, decode_header};
use tracing::debug;

use crate::auth::claims::Claims;
use crate::auth::config::{ConfigError, GateConfig};
use crate::auth::context::AuthContext;
use crate::auth::credential::extract_credential;
use crate::auth::error::AuthError;
use crate::auth::secret::SigningSecret;

/// Verifies request credentials against a shared secret.
///
/// All state is fixed at construction, so one instance can be shared across
/// any number of concurrent requests behind an `Arc`.
pub struct VerificationGate {
    config: GateConfig,
    header_name: HeaderName,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl VerificationGate {
    /// Build a gate from validated configuration and key material.
    pub fn new(config: GateConfig, secret: &SigningSecret) -> Result<Self, ConfigError> {
        let header_name = config.validate()?;

        let mut validation = Validation::new(config.algorithms[0]);
        validation.algorithms = config.algorithms.clone();
        validation.leeway = config.leeway_seconds;
        validation.validate_exp = true;
        validation.validate_nbf = true;

        validation.required_spec_claims.clear();
        if config.require_exp {
            validation.set_required_spec_claims(&["exp"]);
        }

        if let Some(issuer) = &config.issuer {
            validation.set_issuer(&[issuer]);
        }

        match &config.audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }

        Ok(Self {
            header_name,
            decoding_key: DecodingKey::from_secret(secret.expose()),
            validation,
            config,
        })
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    /// Authenticate a request from its headers.
    ///
    /// Returns `MissingCredential` when neither the header nor the cookie is
    /// present, and `InvalidCredential` for anything that fails verification.
    pub fn authenticate(&self, headers: &HeaderMap) -> Result<AuthContext, AuthError> {
        let credential =
            extract_credential(headers, &self.header_name, &self.config.cookie_name)?
                .ok_or(AuthError::MissingCredential)?;

        let claims = self.verify(credential.as_str())?;

        debug!(
            subject = claims.subject().unwrap_or("<none>"),
            source = %credential.source(),
            "Credential verified"
        );

        Ok(AuthContext::new(claims, credential.source()))
    }

    /// Verify a raw token and decode its claims.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let header = decode_header(token)
            .map_err(|e| AuthError::invalid(format!("Invalid JWT header: {}", e)))?;

        // The header's alg only has to match; it never selects the verifier.
        if !self.validation.algorithms.contains(&header.alg) {
            return Err(AuthError::invalid(format!(
                "Algorithm {:?} is not permitted",
                header.alg
            )));
        }

        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| AuthError::invalid(format!("Verification failed: {}", e)))?;

        Ok(token_data.claims)
    }
}

impl fmt::Debug for VerificationGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VerificationGate")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
