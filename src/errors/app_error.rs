use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tokio::task::JoinError;
use tracing::error;

use super::ErrorBody;
use crate::core::ProcessingError;

/// Errors surfaced by request handlers
#[derive(Debug, Error)]
pub enum AppError {
    /// Processing ended in failure; the message is returned to the caller
    #[error(transparent)]
    Processing(#[from] ProcessingError),

    /// The detached processing task panicked or was cancelled
    #[error("Processing task aborted: {0}")]
    TaskAborted(#[from] JoinError),
}

/// Result alias for request handlers
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Processing(_) | AppError::TaskAborted(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let detail = self.to_string();
        error!(status = %status, error = %detail, "Request failed");
        (status, ErrorBody::json(detail)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{StagingError, TranscriptionError};
    use http_body_util::BodyExt;

    async fn body_json(response: Response) -> serde_json::Value {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_processing_error_is_500_with_detail() {
        let err = AppError::from(ProcessingError::Transcription(TranscriptionError::Timeout {
            seconds: 600,
        }));
        let response = err.into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"detail": "transcription timed out after 600 seconds"})
        );
    }

    #[tokio::test]
    async fn test_panicked_task_is_500() {
        let join_error = tokio::spawn(async { panic!("boom") }).await.unwrap_err();
        let response = AppError::from(join_error).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let detail = body_json(response).await["detail"]
            .as_str()
            .unwrap()
            .to_string();
        assert!(detail.starts_with("Processing task aborted"));
    }

    #[tokio::test]
    async fn test_blocked_url_detail() {
        let err = AppError::from(ProcessingError::Staging(StagingError::BlockedUrl));
        let response = err.into_response();
        assert_eq!(
            body_json(response).await["detail"],
            "Blocked private/local audio URL"
        );
    }
}
