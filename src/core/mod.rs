pub mod callback;
pub mod processor;
pub mod signals;
pub mod staging;
pub mod transcription;
pub mod types;

// Re-export commonly used types for convenience
pub use callback::{CallbackDispatcher, DeliveryError, WORKER_SECRET_HEADER};
pub use processor::{MemoryProcessor, ProcessingError};
pub use signals::{
    Embedder, EntityExtractor, EntityLabeler, EntitySpan, InferenceClient, InferenceEmbedder,
    InferenceLabeler, SignalError, SignalExtractor, TranscriptSignals,
};
pub use staging::{AudioStager, StagingError, StagingPolicy};
pub use transcription::{
    AssemblyAIClient, AssemblyAIConfig, Clock, ManualClock, TokioClock, TranscriptionError,
    TranscriptionProvider, TranscriptionResult,
};
pub use types::{CallbackPayload, ExtractedEntities, ProcessRequest, ProcessingStatus};
