//! AssemblyAI REST client implementation.
//!
//! Implements [`TranscriptionProvider`] on top of three endpoints:
//!
//! ```text
//! POST /v2/transcript        create job  ──▶ id
//! GET  /v2/transcript/{id}   poll status ──▶ queued | processing | completed | error
//! POST /v2/upload            raw bytes   ──▶ upload_url
//! ```

use async_trait::async_trait;
use reqwest::{Body, Client, Response};
use std::path::Path;
use std::sync::Arc;
use tokio_util::io::ReaderStream;
use tracing::{debug, info, warn};

use super::config::{AssemblyAIConfig, CREATE_TIMEOUT, STATUS_TIMEOUT, UPLOAD_TIMEOUT};
use super::messages::{
    ApiErrorResponse, CreateTranscriptRequest, CreateTranscriptResponse, TranscriptResponse,
    TranscriptStatus, UploadResponse, primary_language_subtag,
};
use crate::core::transcription::clock::{Clock, TokioClock};
use crate::core::transcription::{TranscriptionError, TranscriptionProvider, TranscriptionResult};

const USER_AGENT: &str = concat!("talesync-worker/", env!("CARGO_PKG_VERSION"));

/// AssemblyAI batch transcription client.
pub struct AssemblyAIClient {
    config: AssemblyAIConfig,
    http_client: Client,
    clock: Arc<dyn Clock>,
}

impl AssemblyAIClient {
    /// Create a client. Fails with [`TranscriptionError::MissingApiKey`] when
    /// the key is blank.
    pub fn new(config: AssemblyAIConfig) -> Result<Self, TranscriptionError> {
        if config.api_key.trim().is_empty() {
            return Err(TranscriptionError::MissingApiKey);
        }

        let http_client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| {
                TranscriptionError::Provider(format!("Failed to create HTTP client: {e}"))
            })?;

        Ok(Self {
            config,
            http_client,
            clock: Arc::new(TokioClock),
        })
    }

    /// Replace the time source used by the poll loop.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    async fn fetch_status(&self, job_id: &str) -> Result<TranscriptResponse, TranscriptionError> {
        let response = self
            .http_client
            .get(self.config.transcript_status_url(job_id))
            .header("authorization", &self.config.api_key)
            .timeout(STATUS_TIMEOUT)
            .send()
            .await
            .map_err(|e| request_failed("status query", e))?;

        let response = check_status(response, "status query").await?;
        response
            .json::<TranscriptResponse>()
            .await
            .map_err(|e| {
                TranscriptionError::Provider(format!(
                    "AssemblyAI status query returned malformed body: {e}"
                ))
            })
    }
}

#[async_trait]
impl TranscriptionProvider for AssemblyAIClient {
    async fn create_job(&self, audio_url: &str) -> Result<String, TranscriptionError> {
        let request = CreateTranscriptRequest {
            audio_url,
            speech_models: &self.config.speech_models,
            language_detection: true,
        };

        let response = self
            .http_client
            .post(self.config.transcript_url())
            .header("authorization", &self.config.api_key)
            .timeout(CREATE_TIMEOUT)
            .json(&request)
            .send()
            .await
            .map_err(|e| request_failed("transcription create", e))?;

        let response = check_status(response, "transcription create").await?;
        let body: CreateTranscriptResponse = response.json().await.unwrap_or_default();

        let job_id = body.id.as_deref().map(str::trim).unwrap_or_default();
        if job_id.is_empty() {
            return Err(TranscriptionError::Provider(
                "AssemblyAI transcription create failed: missing id".to_string(),
            ));
        }

        info!(job_id = %job_id, "Transcription job created");
        Ok(job_id.to_string())
    }

    async fn poll_until_complete(
        &self,
        job_id: &str,
    ) -> Result<TranscriptionResult, TranscriptionError> {
        let Some(deadline) = self.clock.now().checked_add(self.config.poll_timeout) else {
            return Err(TranscriptionError::Provider(format!(
                "poll timeout of {} seconds is out of range",
                self.config.poll_timeout.as_secs()
            )));
        };
        let mut attempts: u32 = 0;

        while self.clock.now() < deadline {
            attempts += 1;
            let body = self.fetch_status(job_id).await?;

            match body.job_status() {
                TranscriptStatus::Completed => {
                    let text = body.text.as_deref().unwrap_or_default().trim().to_string();
                    let language_code =
                        primary_language_subtag(body.language_code.as_deref().unwrap_or_default());

                    info!(
                        job_id = %job_id,
                        attempts,
                        language = %language_code,
                        chars = text.len(),
                        "Transcription completed"
                    );
                    return Ok(TranscriptionResult {
                        text,
                        language_code,
                    });
                }
                TranscriptStatus::Error => {
                    let message = body
                        .error
                        .filter(|e| !e.trim().is_empty())
                        .unwrap_or_else(|| "AssemblyAI transcription failed".to_string());
                    warn!(job_id = %job_id, error = %message, "Transcription job failed");
                    return Err(TranscriptionError::Provider(message));
                }
                status => {
                    debug!(job_id = %job_id, ?status, attempts, "Transcription pending");
                    self.clock.sleep(self.config.poll_interval).await;
                }
            }
        }

        warn!(job_id = %job_id, attempts, "Transcription poll deadline exceeded");
        Err(TranscriptionError::Timeout {
            seconds: self.config.poll_timeout.as_secs(),
        })
    }

    async fn upload_local_file(&self, path: &Path) -> Result<String, TranscriptionError> {
        let file = tokio::fs::File::open(path).await.map_err(|e| {
            TranscriptionError::Provider(format!(
                "Failed to open staged audio {}: {e}",
                path.display()
            ))
        })?;
        let body = Body::wrap_stream(ReaderStream::new(file));

        let response = self
            .http_client
            .post(self.config.upload_url())
            .header("authorization", &self.config.api_key)
            .header("content-type", "application/octet-stream")
            .timeout(UPLOAD_TIMEOUT)
            .body(body)
            .send()
            .await
            .map_err(|e| request_failed("upload", e))?;

        let response = check_status(response, "upload").await?;
        let body: UploadResponse = response.json().await.unwrap_or_default();

        let upload_url = body.upload_url.as_deref().map(str::trim).unwrap_or_default();
        if upload_url.is_empty() {
            return Err(TranscriptionError::Provider(
                "AssemblyAI upload failed: missing upload_url".to_string(),
            ));
        }

        debug!("Staged audio uploaded to provider");
        Ok(upload_url.to_string())
    }
}

fn request_failed(operation: &str, error: reqwest::Error) -> TranscriptionError {
    TranscriptionError::Provider(format!("AssemblyAI {operation} request failed: {error}"))
}

/// Map non-2xx responses to a provider error, preferring the API's own
/// `error` message when the body carries one.
async fn check_status(response: Response, operation: &str) -> Result<Response, TranscriptionError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<ApiErrorResponse>(&body)
        .map(|e| e.error)
        .unwrap_or(body);

    Err(TranscriptionError::Provider(format!(
        "AssemblyAI {operation} failed ({status}): {detail}"
    )))
}
