//! Request-scoped identity attached by the gate.

use axum::{extract::FromRequestParts, http::request::Parts};
use serde::Serialize;

use crate::auth::claims::Claims;
use crate::auth::credential::CredentialSource;
use crate::auth::error::AuthError;

/// Verified identity for one request.
///
/// Only the gate constructs this, and only after verification succeeded, so
/// its presence in request extensions means the claims are trusted.
#[derive(Debug, Clone, Serialize)]
pub struct AuthContext {
    claims: Claims,
    source: CredentialSource,
}

impl AuthContext {
    pub(crate) fn new(claims: Claims, source: CredentialSource) -> Self {
        Self { claims, source }
    }

    /// Get the verified claims.
    pub fn claims(&self) -> &Claims {
        &self.claims
    }

    /// Where the credential was read from.
    pub fn source(&self) -> CredentialSource {
        self.source
    }

    /// Shortcut for the `sub` claim.
    pub fn subject(&self) -> Option<&str> {
        self.claims.subject()
    }

    pub fn into_claims(self) -> Claims {
        self.claims
    }
}

/// Handlers behind the gate can take `AuthContext` as an argument. On a route
/// the gate does not cover, extraction fails closed with 401.
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .ok_or(AuthError::MissingCredential)
    }
}
