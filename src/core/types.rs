//! Request-scoped data model shared by the handler, processor and callback.

use serde::{Deserialize, Serialize};

/// Maximum characters of an error message carried in a failure callback.
pub const MAX_PROCESSING_ERROR_CHARS: usize = 400;

/// Inbound `/process` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessRequest {
    pub memory_id: String,
    pub audio_url: String,
}

/// People, places and dates mentioned in a transcript.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedEntities {
    pub people: Vec<String>,
    pub places: Vec<String>,
    pub dates: Vec<String>,
}

/// Terminal status reported to the callback endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingStatus {
    Completed,
    Failed,
}

/// Body posted to `{callback_base}/{memory_id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallbackPayload {
    pub transcript: String,
    pub entities: ExtractedEntities,
    pub topic: String,
    pub embedding: Vec<f32>,
    pub status: ProcessingStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_error: Option<String>,
}

impl CallbackPayload {
    pub fn completed(
        transcript: String,
        entities: ExtractedEntities,
        topic: String,
        embedding: Vec<f32>,
    ) -> Self {
        Self {
            transcript,
            entities,
            topic,
            embedding,
            status: ProcessingStatus::Completed,
            processing_error: None,
        }
    }

    /// Empty-result payload carrying a truncated error message.
    pub fn failed(error: &str) -> Self {
        Self {
            transcript: String::new(),
            entities: ExtractedEntities::default(),
            topic: String::new(),
            embedding: Vec::new(),
            status: ProcessingStatus::Failed,
            processing_error: Some(truncate_chars(error, MAX_PROCESSING_ERROR_CHARS)),
        }
    }
}

/// Keep at most `max` characters of `text`.
pub fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_process_request_camel_case() {
        let req: ProcessRequest =
            serde_json::from_value(json!({"memoryId": "m1", "audioUrl": "https://a/b.mp3"}))
                .unwrap();
        assert_eq!(req.memory_id, "m1");
        assert_eq!(req.audio_url, "https://a/b.mp3");
    }

    #[test]
    fn test_completed_payload_omits_processing_error() {
        let payload = CallbackPayload::completed(
            "hello".to_string(),
            ExtractedEntities {
                people: vec!["Anna".to_string()],
                places: vec![],
                dates: vec!["1990".to_string()],
            },
            "Life Memory".to_string(),
            vec![0.5, 0.25],
        );
        let value = serde_json::to_value(&payload).unwrap();

        assert_eq!(value["status"], "completed");
        assert_eq!(value["entities"]["people"][0], "Anna");
        assert_eq!(value["embedding"][1], 0.25);
        assert!(value.get("processingError").is_none());
    }

    #[test]
    fn test_failed_payload_shape() {
        let payload = CallbackPayload::failed("AssemblyAI transcription failed");
        let value = serde_json::to_value(&payload).unwrap();

        assert_eq!(
            value,
            json!({
                "transcript": "",
                "entities": {"people": [], "places": [], "dates": []},
                "topic": "",
                "embedding": [],
                "status": "failed",
                "processingError": "AssemblyAI transcription failed"
            })
        );
    }

    #[test]
    fn test_failed_payload_truncates_by_characters() {
        let long = "é".repeat(500);
        let payload = CallbackPayload::failed(&long);
        let message = payload.processing_error.unwrap();
        assert_eq!(message.chars().count(), MAX_PROCESSING_ERROR_CHARS);
    }
}
