//! Axum middleware placing the gate in front of protected routes.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::{debug, warn};

use crate::auth::error::AuthError;
use crate::auth::gate::VerificationGate;

/// Admit the request only if it carries a valid credential.
///
/// On success the verified `AuthContext` is inserted into the request
/// extensions before `next` runs. On failure `next` is never called.
pub async fn require_auth(
    State(gate): State<Arc<VerificationGate>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    match gate.authenticate(req.headers()) {
        Ok(ctx) => {
            req.extensions_mut().insert(ctx);
            Ok(next.run(req).await)
        }
        Err(err) => {
            match &err {
                AuthError::MissingCredential => {
                    debug!(method = %req.method(), path = %req.uri().path(), "Request rejected: no credential");
                }
                AuthError::InvalidCredential(reason) => {
                    warn!(method = %req.method(), path = %req.uri().path(), reason = %reason, "Request rejected: invalid credential");
                }
            }
            Err(err)
        }
    }
}
