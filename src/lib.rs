pub mod api;
pub mod auth;
pub mod server;

// Re-export key types and functions
pub use auth::{
    AuthContext, AuthError, Claims, ConfigError, CredentialSource, GateConfig, SigningSecret,
    VerificationGate, require_auth,
};
pub use server::start_http;
