use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use super::ErrorBody;

/// Shared-secret authentication failures.
///
/// Every variant answers with the same `401 {"detail": "Unauthorized"}` so
/// callers cannot tell a misconfigured worker from a wrong secret.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing x-worker-secret header")]
    MissingSecret,

    #[error("Invalid worker secret")]
    InvalidSecret,

    #[error("Worker secret is not configured")]
    NotConfigured,
}

/// Result alias for secret verification
pub type AuthResult<T> = Result<T, AuthError>;

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (StatusCode::UNAUTHORIZED, ErrorBody::json("Unauthorized")).into_response()
    }
}
