use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::WorkerConfig;
use crate::core::callback::{CallbackDispatcher, DeliveryError};
use crate::core::processor::MemoryProcessor;
use crate::core::signals::{
    Embedder, EntityExtractor, EntityLabeler, InferenceClient, InferenceEmbedder,
    InferenceLabeler, SignalExtractor,
};
use crate::core::transcription::{AssemblyAIClient, TranscriptionError, TranscriptionProvider};

/// Errors raised while wiring application state
#[derive(Debug, Error)]
pub enum StateError {
    #[error("Failed to initialise transcription provider: {0}")]
    Transcription(#[from] TranscriptionError),

    #[error("Failed to initialise callback dispatcher: {0}")]
    Callback(#[from] DeliveryError),
}

/// Application state shared by all handlers
///
/// Holds the immutable configuration and the request processor built from it.
pub struct AppState {
    pub config: Arc<WorkerConfig>,
    pub processor: Arc<MemoryProcessor>,
}

impl AppState {
    /// Build state from configuration.
    pub async fn new(config: WorkerConfig) -> Result<Arc<Self>, StateError> {
        let provider: Option<Arc<dyn TranscriptionProvider>> = match config.assemblyai_config() {
            Some(provider_config) => Some(Arc::new(AssemblyAIClient::new(provider_config)?)),
            None => None,
        };

        let dispatcher = CallbackDispatcher::new(
            &config.api_callback_base,
            config.worker_secret.clone().unwrap_or_default(),
        )?;

        let processor = MemoryProcessor::new(
            provider,
            config.staging_policy(),
            build_signal_extractor(&config),
            dispatcher,
        );
        if !processor.has_provider() {
            warn!("ASSEMBLYAI_API_KEY is not set; every /process request will fail");
        }

        Ok(Self::from_parts(config, processor))
    }

    /// Assemble state from an already-built processor.
    pub fn from_parts(config: WorkerConfig, processor: MemoryProcessor) -> Arc<Self> {
        Arc::new(Self {
            config: Arc::new(config),
            processor: Arc::new(processor),
        })
    }
}

fn build_signal_extractor(config: &WorkerConfig) -> SignalExtractor {
    let Some(token) = config.inference_api_token.as_deref() else {
        info!("INFERENCE_API_TOKEN not set; entity models and embeddings disabled");
        return SignalExtractor::default();
    };

    let client = Arc::new(InferenceClient::new(&config.inference_base_url, token));
    let multilingual: Arc<dyn EntityLabeler> =
        Arc::new(InferenceLabeler::new(client.clone(), &config.ner_model));
    let english: Arc<dyn EntityLabeler> =
        Arc::new(InferenceLabeler::new(client.clone(), &config.english_ner_model));
    let embedder: Arc<dyn Embedder> =
        Arc::new(InferenceEmbedder::new(client, &config.embedding_model));

    info!(
        ner_model = %config.ner_model,
        english_ner_model = %config.english_ner_model,
        embedding_model = %config.embedding_model,
        "Signal extraction models configured"
    );

    SignalExtractor::new(
        EntityExtractor::new(Some(multilingual), Some(english)),
        Some(embedder),
    )
}
