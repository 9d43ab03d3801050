//! Authentication errors and their HTTP responses.

use std::fmt;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Authentication errors.
///
/// Only two kinds ever reach the client. The reason carried by
/// `InvalidCredential` is for logs and is never written to a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Neither the header nor the cookie carried a credential
    MissingCredential,
    /// A credential was present but failed verification
    InvalidCredential(String),
}

impl AuthError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidCredential(reason.into())
    }

    /// HTTP status returned for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingCredential => StatusCode::UNAUTHORIZED,
            Self::InvalidCredential(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Fixed client-facing message.
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::MissingCredential => "Access denied",
            Self::InvalidCredential(_) => "Invalid token",
        }
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingCredential => write!(f, "No credential provided"),
            Self::InvalidCredential(reason) => write!(f, "Invalid credential: {}", reason),
        }
    }
}

impl std::error::Error for AuthError {}

/// Error response JSON.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.public_message(),
        };
        (self.status(), Json(body)).into_response()
    }
}
