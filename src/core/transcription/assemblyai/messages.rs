//! Request and response bodies for the AssemblyAI v2 REST API.
//!
//! Response fields are all optional: the provider omits or nulls fields
//! depending on job state, and a missing identifier must surface as a
//! provider error rather than a deserialization failure.

use serde::{Deserialize, Serialize};

/// Body of `POST /v2/transcript`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateTranscriptRequest<'a> {
    pub audio_url: &'a str,
    pub speech_models: &'a [String],
    pub language_detection: bool,
}

/// Response of `POST /v2/transcript`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateTranscriptResponse {
    #[serde(default)]
    pub id: Option<String>,
}

/// Response of `GET /v2/transcript/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TranscriptResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub language_code: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl TranscriptResponse {
    pub fn job_status(&self) -> TranscriptStatus {
        TranscriptStatus::parse(self.status.as_deref().unwrap_or_default())
    }
}

/// Response of `POST /v2/upload`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub upload_url: Option<String>,
}

/// Error body returned with non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub error: String,
}

/// Lifecycle state of a transcript job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptStatus {
    Queued,
    Processing,
    Completed,
    Error,
    Unknown(String),
}

impl TranscriptStatus {
    /// Parse a status string (case-insensitive).
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "queued" => Self::Queued,
            "processing" => Self::Processing,
            "completed" => Self::Completed,
            "error" => Self::Error,
            other => Self::Unknown(other.to_string()),
        }
    }
}

/// Extracts the primary language subtag: `en_us` → `en`, `pt-BR` → `pt`.
pub fn primary_language_subtag(language_code: &str) -> String {
    let code = language_code.trim().to_lowercase();
    code.split(['_', '-'])
        .next()
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_case_insensitive() {
        assert_eq!(TranscriptStatus::parse("COMPLETED"), TranscriptStatus::Completed);
        assert_eq!(TranscriptStatus::parse("error"), TranscriptStatus::Error);
        assert_eq!(TranscriptStatus::parse(" queued "), TranscriptStatus::Queued);
        assert_eq!(
            TranscriptStatus::parse("paused"),
            TranscriptStatus::Unknown("paused".to_string())
        );
        assert_eq!(
            TranscriptStatus::parse(""),
            TranscriptStatus::Unknown(String::new())
        );
    }

    #[test]
    fn test_primary_language_subtag() {
        assert_eq!(primary_language_subtag("en_us"), "en");
        assert_eq!(primary_language_subtag("EN"), "en");
        assert_eq!(primary_language_subtag("pt-BR"), "pt");
        assert_eq!(primary_language_subtag(" hi "), "hi");
        assert_eq!(primary_language_subtag(""), "");
    }

    #[test]
    fn test_transcript_response_tolerates_nulls() {
        let body: TranscriptResponse = serde_json::from_str(
            r#"{"id":"abc","status":"processing","text":null,"language_code":null}"#,
        )
        .unwrap();
        assert_eq!(body.job_status(), TranscriptStatus::Processing);
        assert!(body.text.is_none());
    }

    #[test]
    fn test_create_request_serialization() {
        let models = vec!["universal-2".to_string()];
        let request = CreateTranscriptRequest {
            audio_url: "https://cdn.example.com/a.mp3",
            speech_models: &models,
            language_detection: true,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["audio_url"], "https://cdn.example.com/a.mp3");
        assert_eq!(json["speech_models"][0], "universal-2");
        assert_eq!(json["language_detection"], true);
    }
}
