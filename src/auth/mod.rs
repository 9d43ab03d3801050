//! Credential verification gate.
//!
//! Every request to a protected route passes through [`require_auth`], which
//! asks the [`VerificationGate`] to:
//!
//! - **Extract** a credential from the `x-auth-token` header, falling back to
//!   the `token` cookie
//! - **Verify** its HMAC signature and `exp`/`nbf` against the configured
//!   secret, with the algorithm pinned by configuration
//! - **Attach** the decoded [`Claims`] to the request as an [`AuthContext`]
//!
//! ## Security Model
//!
//! - The secret is injected once at construction and never logged
//! - The `alg` header of a credential is checked against the pinned set but
//!   never chooses the verifier
//! - Claims reach handlers only after verification succeeded
//! - Clients see one of two fixed error bodies; failure detail stays in logs
//!
//! ## Usage
//!
//! ```ignore
//! let gate = Arc::new(VerificationGate::new(GateConfig::default(), &secret)?);
//! let app = Router::new()
//!     .route("/me", get(me))
//!     .route_layer(middleware::from_fn_with_state(gate, require_auth));
//!
//! async fn me(ctx: AuthContext) -> Json<Claims> {
//!     Json(ctx.into_claims())
//! }
//! ```

mod claims;
mod config;
mod context;
mod credential;
mod error;
mod gate;
mod middleware;
mod secret;

pub use claims::Claims;
pub use config::{ConfigError, DEFAULT_COOKIE_NAME, DEFAULT_HEADER_NAME, GateConfig};
pub use context::AuthContext;
pub use credential::{Credential, CredentialSource, extract_credential};
pub use error::AuthError;
pub use gate::VerificationGate;
pub use middleware::require_auth;
pub use secret::SigningSecret;

#[cfg(test)]
pub(crate) use gate::tests as test_support;
