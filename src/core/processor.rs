//! End-to-end processing of one recorded memory.
//!
//! ```text
//! stage audio ──▶ transcribe ──▶ extract signals ──▶ deliver "completed"
//!      │               │
//!      └───── error ───┴──▶ deliver "failed" (best effort) ──▶ Err
//! ```
//!
//! Exactly one callback is attempted per call. A failed delivery of the
//! success payload is returned as an error without sending a second one.

use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::core::callback::{CallbackDispatcher, DeliveryError};
use crate::core::signals::SignalExtractor;
use crate::core::staging::{AudioStager, StagingError, StagingPolicy};
use crate::core::transcription::{TranscriptionError, TranscriptionProvider, TranscriptionResult};
use crate::core::types::{CallbackPayload, ProcessRequest};

/// Errors that end a processing run
#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error(transparent)]
    Staging(#[from] StagingError),

    #[error(transparent)]
    Transcription(#[from] TranscriptionError),

    #[error(transparent)]
    Delivery(#[from] DeliveryError),
}

/// Transcription provider together with the stager that feeds it.
struct TranscriptionPipeline {
    provider: Arc<dyn TranscriptionProvider>,
    stager: AudioStager,
}

/// Runs the transcribe, extract and deliver sequence for a request.
pub struct MemoryProcessor {
    pipeline: Option<TranscriptionPipeline>,
    signals: SignalExtractor,
    dispatcher: CallbackDispatcher,
}

impl MemoryProcessor {
    /// `provider` is `None` when no provider credentials are configured;
    /// every request then fails with [`TranscriptionError::MissingApiKey`].
    pub fn new(
        provider: Option<Arc<dyn TranscriptionProvider>>,
        policy: StagingPolicy,
        signals: SignalExtractor,
        dispatcher: CallbackDispatcher,
    ) -> Self {
        let pipeline = provider.map(|provider| TranscriptionPipeline {
            stager: AudioStager::new(policy, provider.clone()),
            provider,
        });

        Self {
            pipeline,
            signals,
            dispatcher,
        }
    }

    pub fn has_provider(&self) -> bool {
        self.pipeline.is_some()
    }

    /// Process `request` and deliver exactly one callback for it.
    pub async fn process(&self, request: &ProcessRequest) -> Result<(), ProcessingError> {
        let memory_id = request.memory_id.as_str();
        info!(memory_id = %memory_id, "Processing memory");

        let transcript = match self.acquire_transcript(&request.audio_url).await {
            Ok(transcript) => transcript,
            Err(e) => {
                warn!(memory_id = %memory_id, error = %e, "Transcription stage failed");
                let payload = CallbackPayload::failed(&e.to_string());
                if let Err(delivery) = self.dispatcher.deliver(memory_id, &payload).await {
                    error!(
                        memory_id = %memory_id,
                        error = %delivery,
                        "Failed to deliver failure callback"
                    );
                }
                return Err(e);
            }
        };

        let signals = self
            .signals
            .extract(&transcript.text, &transcript.language_code)
            .await;

        let payload = CallbackPayload::completed(
            transcript.text,
            signals.entities,
            signals.topic,
            signals.embedding,
        );

        self.dispatcher.deliver(memory_id, &payload).await?;
        info!(memory_id = %memory_id, "Memory processed");
        Ok(())
    }

    async fn acquire_transcript(
        &self,
        audio_url: &str,
    ) -> Result<TranscriptionResult, ProcessingError> {
        let pipeline = self
            .pipeline
            .as_ref()
            .ok_or(TranscriptionError::MissingApiKey)?;

        let source_url = pipeline.stager.resolve_source_url(audio_url).await?;
        Ok(pipeline.provider.transcribe(&source_url).await?)
    }
}
