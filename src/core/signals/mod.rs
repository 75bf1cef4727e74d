//! Lightweight structured signals derived from a transcript.
//!
//! NLP models are consumed through two narrow traits so the orchestration
//! layer can run against deterministic stubs:
//!
//! - [`EntityLabeler`]: text → labeled spans (`PER`, `LOC`, `DATE`, ...)
//! - [`Embedder`]: text → dense vector
//!
//! Everything else here is pure: date scan, list cleanup and keyword topic
//! detection. Failures of a model never fail the request; they only empty the
//! model's contribution.

pub mod cleanup;
pub mod dates;
pub mod entities;
pub mod inference;
pub mod topic;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;

use crate::core::types::ExtractedEntities;

pub use cleanup::{ENTITY_BLOCKLIST, MAX_ITEMS, clean_items};
pub use dates::extract_dates;
pub use entities::EntityExtractor;
pub use inference::{InferenceClient, InferenceEmbedder, InferenceLabeler};
pub use topic::{DEFAULT_TOPIC, detect_topic};

/// Errors raised by NLP model adapters
#[derive(Debug, Error)]
pub enum SignalError {
    #[error("inference request failed: {0}")]
    RequestFailed(String),
    #[error("invalid inference response: {0}")]
    InvalidResponse(String),
}

/// A span of text tagged with an entity label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitySpan {
    pub label: String,
    pub text: String,
}

impl EntitySpan {
    pub fn new(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            text: text.into(),
        }
    }
}

#[async_trait]
pub trait EntityLabeler: Send + Sync {
    async fn label(&self, text: &str) -> Result<Vec<EntitySpan>, SignalError>;
}

#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, SignalError>;
}

/// Signals attached to a successful callback.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TranscriptSignals {
    pub entities: ExtractedEntities,
    pub topic: String,
    pub embedding: Vec<f32>,
}

/// Runs entity extraction, topic detection and embedding for one transcript.
#[derive(Clone, Default)]
pub struct SignalExtractor {
    entities: EntityExtractor,
    embedder: Option<Arc<dyn Embedder>>,
}

impl SignalExtractor {
    pub fn new(entities: EntityExtractor, embedder: Option<Arc<dyn Embedder>>) -> Self {
        Self { entities, embedder }
    }

    pub async fn extract(&self, transcript: &str, language_code: &str) -> TranscriptSignals {
        let entities = self.entities.extract(transcript, language_code).await;
        let topic = detect_topic(transcript).to_string();
        let embedding = self.embed(transcript).await;

        TranscriptSignals {
            entities,
            topic,
            embedding,
        }
    }

    /// Embed `text`, yielding an empty vector on failure or empty input.
    pub async fn embed(&self, text: &str) -> Vec<f32> {
        let Some(embedder) = &self.embedder else {
            return Vec::new();
        };
        if text.trim().is_empty() {
            return Vec::new();
        }

        match embedder.embed(text).await {
            Ok(vector) => vector,
            Err(e) => {
                warn!(error = %e, "Embedding failed, continuing with empty vector");
                Vec::new()
            }
        }
    }
}
