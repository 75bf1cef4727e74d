use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::auth::verify_worker_secret;
use crate::core::callback::WORKER_SECRET_HEADER;
use crate::errors::AuthResult;
use crate::state::AppState;

/// Shared-secret middleware for worker endpoints
///
/// Runs before the body is read, so rejected requests have no side effects.
/// A header that is not valid UTF-8 is treated as a wrong secret.
pub async fn worker_secret_middleware(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> AuthResult<Response> {
    let provided = request
        .headers()
        .get(WORKER_SECRET_HEADER)
        .map(|value| value.to_str().unwrap_or_default());

    if let Err(e) = verify_worker_secret(provided, state.config.worker_secret.as_deref()) {
        tracing::warn!(
            method = %request.method(),
            path = %request.uri().path(),
            reason = %e,
            "Worker secret check failed"
        );
        return Err(e);
    }

    Ok(next.run(request).await)
}
