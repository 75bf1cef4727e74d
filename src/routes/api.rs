use axum::{
    Router, middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::handlers::{api, process};
use crate::middleware::worker_secret_middleware;
use crate::state::AppState;

/// Create the worker router
///
/// `/health` is public; `/process` requires the shared worker secret.
pub fn create_api_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    let protected = Router::new()
        .route("/process", post(process::process_memory))
        .layer(middleware::from_fn_with_state(
            state,
            worker_secret_middleware,
        ));

    Router::new()
        .route("/health", get(api::health_check))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
}
