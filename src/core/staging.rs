//! Audio staging for URLs the transcription provider cannot reach.
//!
//! Audio hosted inside the deployer's private network (for example a local
//! API server in development) is invisible to the provider. Such audio is
//! downloaded to a scratch file by the worker and pushed to the provider's
//! upload endpoint instead. In production, private targets are refused unless
//! explicitly allowed so the worker cannot be used to probe internal hosts.

use futures::StreamExt;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tempfile::NamedTempFile;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use crate::core::transcription::{TranscriptionError, TranscriptionProvider};
use crate::utils::url_validation::{UrlValidationError, is_private_or_local, parse_audio_url};

/// Timeout for downloading private audio.
pub const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(180);

/// Errors raised while making audio reachable for the provider
#[derive(Debug, Error)]
pub enum StagingError {
    #[error("Invalid audio URL: {0}")]
    InvalidUrl(#[from] UrlValidationError),

    #[error("Blocked private/local audio URL")]
    BlockedUrl,

    #[error("Audio download failed: {0}")]
    Download(String),

    #[error("Audio staging I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Upload(#[from] TranscriptionError),
}

/// Private-network fetch policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StagingPolicy {
    /// Explicit opt-in to fetching private/local audio.
    pub allow_local_fetch: bool,
    /// Deployment is flagged as production.
    pub is_production: bool,
}

impl StagingPolicy {
    /// Private targets are refused only in production without the opt-in.
    pub fn permits_private_fetch(&self) -> bool {
        self.allow_local_fetch || !self.is_production
    }
}

/// Resolves audio URLs into URLs the provider can fetch.
pub struct AudioStager {
    policy: StagingPolicy,
    provider: Arc<dyn TranscriptionProvider>,
    http_client: Client,
}

impl AudioStager {
    pub fn new(policy: StagingPolicy, provider: Arc<dyn TranscriptionProvider>) -> Self {
        Self {
            policy,
            provider,
            http_client: Client::new(),
        }
    }

    /// Return a provider-reachable URL for `original_url`.
    ///
    /// Public URLs are returned unchanged. Private/local URLs are downloaded to
    /// a temporary file and uploaded to the provider; the file is removed
    /// before this returns, whatever the outcome.
    pub async fn resolve_source_url(&self, original_url: &str) -> Result<String, StagingError> {
        let parsed = parse_audio_url(original_url)?;
        let is_private = parsed.host().map(|h| is_private_or_local(&h)).unwrap_or(false);

        if !is_private {
            return Ok(original_url.trim().to_string());
        }

        if !self.policy.permits_private_fetch() {
            warn!(
                host = parsed.host_str().unwrap_or_default(),
                "Refusing private/local audio URL in production (SSRF protection)"
            );
            return Err(StagingError::BlockedUrl);
        }

        info!(
            host = parsed.host_str().unwrap_or_default(),
            "Staging private/local audio through worker"
        );

        // Dropping the handle unlinks the file on every exit path.
        let staged = tempfile::Builder::new()
            .prefix("talesync-")
            .suffix(".audio")
            .tempfile()?;

        self.download_to(parsed.as_str(), &staged).await?;
        let upload_url = self.provider.upload_local_file(staged.path()).await?;

        let path = staged.path().to_path_buf();
        if let Err(e) = staged.close() {
            warn!(path = %path.display(), error = %e, "Failed to remove staged audio file");
        }

        Ok(upload_url)
    }

    async fn download_to(&self, url: &str, staged: &NamedTempFile) -> Result<(), StagingError> {
        let response = self
            .http_client
            .get(url)
            .timeout(DOWNLOAD_TIMEOUT)
            .send()
            .await
            .map_err(|e| StagingError::Download(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(StagingError::Download(format!("HTTP {status} from {url}")));
        }

        let mut file = tokio::fs::File::from_std(staged.reopen()?);
        let mut stream = response.bytes_stream();
        let mut written: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| StagingError::Download(e.to_string()))?;
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;

        debug!(bytes = written, path = %staged.path().display(), "Audio staged");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::transcription::TranscriptionResult;
    use async_trait::async_trait;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Records uploaded file contents and paths.
    #[derive(Default)]
    struct RecordingProvider {
        uploads: Mutex<Vec<(PathBuf, Vec<u8>)>>,
        fail_upload: bool,
    }

    #[async_trait]
    impl TranscriptionProvider for RecordingProvider {
        async fn create_job(&self, _audio_url: &str) -> Result<String, TranscriptionError> {
            unreachable!("staging never creates jobs")
        }

        async fn poll_until_complete(
            &self,
            _job_id: &str,
        ) -> Result<TranscriptionResult, TranscriptionError> {
            unreachable!("staging never polls")
        }

        async fn upload_local_file(&self, path: &Path) -> Result<String, TranscriptionError> {
            let bytes = std::fs::read(path).unwrap();
            self.uploads
                .lock()
                .unwrap()
                .push((path.to_path_buf(), bytes));
            if self.fail_upload {
                return Err(TranscriptionError::Provider(
                    "AssemblyAI upload failed: missing upload_url".to_string(),
                ));
            }
            Ok("https://cdn.assemblyai.com/upload/staged".to_string())
        }
    }

    fn dev_policy() -> StagingPolicy {
        StagingPolicy {
            allow_local_fetch: false,
            is_production: false,
        }
    }

    #[test]
    fn test_policy_matrix() {
        let p = |allow, prod| StagingPolicy {
            allow_local_fetch: allow,
            is_production: prod,
        };
        assert!(p(false, false).permits_private_fetch());
        assert!(p(true, false).permits_private_fetch());
        assert!(p(true, true).permits_private_fetch());
        assert!(!p(false, true).permits_private_fetch());
    }

    #[tokio::test]
    async fn test_public_url_is_returned_unchanged() {
        let provider = Arc::new(RecordingProvider::default());
        let stager = AudioStager::new(dev_policy(), provider.clone());

        let url = stager
            .resolve_source_url("https://res.cloudinary.com/demo/video/upload/a.webm")
            .await
            .unwrap();

        assert_eq!(url, "https://res.cloudinary.com/demo/video/upload/a.webm");
        assert!(provider.uploads.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_private_url_blocked_in_production() {
        let provider = Arc::new(RecordingProvider::default());
        let policy = StagingPolicy {
            allow_local_fetch: false,
            is_production: true,
        };
        let stager = AudioStager::new(policy, provider.clone());

        let err = stager
            .resolve_source_url("http://10.0.0.5/internal/admin")
            .await
            .unwrap_err();

        assert!(matches!(err, StagingError::BlockedUrl));
        assert_eq!(err.to_string(), "Blocked private/local audio URL");
        assert!(provider.uploads.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_url_rejected() {
        let stager = AudioStager::new(dev_policy(), Arc::new(RecordingProvider::default()));
        let err = stager.resolve_source_url("not a url").await.unwrap_err();
        assert!(matches!(err, StagingError::InvalidUrl(_)));
    }

    #[tokio::test]
    async fn test_private_url_is_staged_and_uploaded() {
        // MockServer listens on 127.0.0.1, which classifies as local.
        let origin = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/uploads/memory.webm"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"RIFF-audio".to_vec()))
            .expect(1)
            .mount(&origin)
            .await;

        let provider = Arc::new(RecordingProvider::default());
        let stager = AudioStager::new(dev_policy(), provider.clone());

        let url = stager
            .resolve_source_url(&format!("{}/uploads/memory.webm", origin.uri()))
            .await
            .unwrap();

        assert_eq!(url, "https://cdn.assemblyai.com/upload/staged");
        let uploads = provider.uploads.lock().unwrap();
        assert_eq!(uploads.len(), 1);
        assert_eq!(uploads[0].1, b"RIFF-audio");
        assert!(!uploads[0].0.exists(), "staged file must be removed");
    }

    #[tokio::test]
    async fn test_staged_file_removed_when_upload_fails() {
        let origin = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"bytes".to_vec()))
            .mount(&origin)
            .await;

        let provider = Arc::new(RecordingProvider {
            fail_upload: true,
            ..Default::default()
        });
        let stager = AudioStager::new(dev_policy(), provider.clone());

        let err = stager
            .resolve_source_url(&format!("{}/a.mp3", origin.uri()))
            .await
            .unwrap_err();

        assert!(matches!(err, StagingError::Upload(_)));
        let uploads = provider.uploads.lock().unwrap();
        assert!(!uploads[0].0.exists(), "staged file must be removed");
    }

    #[tokio::test]
    async fn test_download_failure_status() {
        let origin = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&origin)
            .await;

        let provider = Arc::new(RecordingProvider::default());
        let policy = StagingPolicy {
            allow_local_fetch: true,
            is_production: true,
        };
        let stager = AudioStager::new(policy, provider.clone());

        let err = stager
            .resolve_source_url(&format!("{}/missing.mp3", origin.uri()))
            .await
            .unwrap_err();

        assert!(matches!(err, StagingError::Download(_)));
        assert!(err.to_string().contains("404"));
        assert!(provider.uploads.lock().unwrap().is_empty());
    }
}
