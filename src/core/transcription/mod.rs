//! Speech-to-text transcription for recorded memories.
//!
//! The worker talks to a batch transcription provider that only supports
//! create-then-query semantics: a job is created for an audio URL and its
//! status is polled until it finishes. Audio the provider cannot reach is
//! first pushed to the provider through a direct upload.
//!
//! - [`TranscriptionProvider`]: the seam the orchestration layer depends on
//! - [`assemblyai`]: AssemblyAI v2 REST implementation
//! - [`clock`]: injectable time source for the poll loop

pub mod assemblyai;
pub mod clock;

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

pub use assemblyai::{AssemblyAIClient, AssemblyAIConfig};
pub use clock::{Clock, ManualClock, TokioClock};

/// Transcript text and detected language of a finished job.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TranscriptionResult {
    pub text: String,
    /// Primary language subtag such as `en`, or empty when undetected.
    pub language_code: String,
}

/// Errors raised while transcribing audio
#[derive(Debug, Error)]
pub enum TranscriptionError {
    /// No provider API key configured
    #[error("ASSEMBLYAI_API_KEY is missing in worker configuration")]
    MissingApiKey,

    /// Provider returned an error, a malformed response, or could not be reached
    #[error("{0}")]
    Provider(String),

    /// Job did not finish before the poll deadline
    #[error("transcription timed out after {seconds} seconds")]
    Timeout { seconds: u64 },
}

/// Batch transcription provider
#[async_trait]
pub trait TranscriptionProvider: Send + Sync {
    /// Create a transcription job for `audio_url` and return its identifier.
    async fn create_job(&self, audio_url: &str) -> Result<String, TranscriptionError>;

    /// Poll `job_id` at a fixed interval until it completes, fails, or the
    /// poll deadline elapses.
    async fn poll_until_complete(
        &self,
        job_id: &str,
    ) -> Result<TranscriptionResult, TranscriptionError>;

    /// Stream a local file to the provider and return a URL the provider can
    /// fetch it from.
    async fn upload_local_file(&self, path: &Path) -> Result<String, TranscriptionError>;

    /// Create a job and wait for its result.
    async fn transcribe(&self, audio_url: &str) -> Result<TranscriptionResult, TranscriptionError> {
        let job_id = self.create_job(audio_url).await?;
        self.poll_until_complete(&job_id).await
    }
}
