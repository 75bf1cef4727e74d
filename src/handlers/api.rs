use axum::{Json, response::IntoResponse};
use serde::Serialize;

/// `{"ok": true}` acknowledgement body
#[derive(Debug, Serialize)]
pub struct OkResponse {
    pub ok: bool,
}

impl OkResponse {
    pub fn ok() -> Json<Self> {
        Json(Self { ok: true })
    }
}

/// Health check handler
pub async fn health_check() -> impl IntoResponse {
    OkResponse::ok()
}
