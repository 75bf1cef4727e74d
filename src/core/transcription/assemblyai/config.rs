//! Configuration types for the AssemblyAI v2 REST API.

use std::time::Duration;

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.assemblyai.com";

/// Speech model requested when none is configured.
pub const DEFAULT_SPEECH_MODEL: &str = "universal-2";

/// Interval between two status queries.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Wall-clock budget for a job to finish, measured from the first poll.
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(600);

/// Timeout for the job creation request.
pub const CREATE_TIMEOUT: Duration = Duration::from_secs(60);

/// Timeout for a single status query.
pub const STATUS_TIMEOUT: Duration = Duration::from_secs(60);

/// Timeout for a direct file upload.
pub const UPLOAD_TIMEOUT: Duration = Duration::from_secs(300);

/// Configuration for [`AssemblyAIClient`](super::AssemblyAIClient).
#[derive(Debug, Clone)]
pub struct AssemblyAIConfig {
    /// API key sent verbatim in the `authorization` header.
    pub api_key: String,

    /// Base URL without trailing slash, e.g. `https://api.assemblyai.com`.
    pub base_url: String,

    /// Speech models requested at job creation.
    pub speech_models: Vec<String>,

    pub poll_interval: Duration,
    pub poll_timeout: Duration,
}

impl Default for AssemblyAIConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            speech_models: vec![DEFAULT_SPEECH_MODEL.to_string()],
            poll_interval: DEFAULT_POLL_INTERVAL,
            poll_timeout: DEFAULT_POLL_TIMEOUT,
        }
    }
}

impl AssemblyAIConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_poll_timeout(mut self, timeout: Duration) -> Self {
        self.poll_timeout = timeout;
        self
    }

    fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// `POST` endpoint creating a transcript job.
    pub fn transcript_url(&self) -> String {
        format!("{}/v2/transcript", self.base())
    }

    /// `GET` endpoint for the status of one job.
    pub fn transcript_status_url(&self, job_id: &str) -> String {
        format!("{}/v2/transcript/{}", self.base(), job_id)
    }

    /// `POST` endpoint accepting raw audio bytes.
    pub fn upload_url(&self) -> String {
        format!("{}/v2/upload", self.base())
    }
}
