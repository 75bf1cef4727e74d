use axum::{Json, extract::State, response::IntoResponse};
use std::sync::Arc;
use tracing::info;

use super::api::OkResponse;
use crate::core::types::ProcessRequest;
use crate::errors::AppResult;
use crate::state::AppState;

/// Transcribe a recorded memory and report the outcome to the API.
///
/// The run is spawned onto its own task so it keeps going, and still
/// delivers its callback, when the caller disconnects before the answer.
pub async fn process_memory(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ProcessRequest>,
) -> AppResult<impl IntoResponse> {
    info!(memory_id = %request.memory_id, "Process request accepted");

    let processor = state.processor.clone();
    let run = tokio::spawn(async move { processor.process(&request).await });
    run.await??;

    Ok(OkResponse::ok())
}
