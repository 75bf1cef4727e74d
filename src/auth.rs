//! Shared-secret verification for worker endpoints.

use subtle::ConstantTimeEq;

use crate::errors::{AuthError, AuthResult};

/// Compare two secrets in constant time with respect to their contents.
pub fn secrets_match(provided: &str, expected: &str) -> bool {
    provided.as_bytes().ct_eq(expected.as_bytes()).into()
}

/// Check the `x-worker-secret` value against the configured secret.
///
/// Fails closed: with no secret configured every request is rejected.
pub fn verify_worker_secret(provided: Option<&str>, configured: Option<&str>) -> AuthResult<()> {
    let expected = match configured {
        Some(secret) if !secret.is_empty() => secret,
        _ => return Err(AuthError::NotConfigured),
    };
    let provided = provided.ok_or(AuthError::MissingSecret)?;

    if secrets_match(provided, expected) {
        Ok(())
    } else {
        Err(AuthError::InvalidSecret)
    }
}
