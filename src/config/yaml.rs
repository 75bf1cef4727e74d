use serde::Deserialize;
use std::path::PathBuf;

use super::ConfigError;

/// Complete YAML configuration structure
///
/// All fields are optional to allow partial configuration. Values present here
/// override the environment.
///
/// # Example YAML structure
/// ```yaml
/// server:
///   host: "0.0.0.0"
///   port: 8000
///   tls:
///     cert_path: "/etc/worker/cert.pem"
///     key_path: "/etc/worker/key.pem"
///
/// worker:
///   secret: "shared-secret"
///   callback_base: "https://api.talesync.app/api/uploads/worker-callback"
///   allow_local_audio_fetch: false
///   environment: "production"
///
/// transcription:
///   api_key: "assemblyai-key"
///   base_url: "https://api.assemblyai.com"
///   speech_models: ["universal-2"]
///   poll_interval_seconds: 2
///   poll_timeout_seconds: 600
///
/// signals:
///   ner_model: "Babelscape/wikineural-multilingual-ner"
///   english_ner_model: "tner/roberta-large-ontonotes5"
///   embedding_model: "sentence-transformers/all-MiniLM-L6-v2"
///   inference_base_url: "https://router.huggingface.co/hf-inference"
///   inference_api_token: "hf_..."
///
/// security:
///   rate_limit_requests_per_second: 50
///   rate_limit_burst_size: 20
/// ```
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct YamlConfig {
    pub server: Option<ServerYaml>,
    pub worker: Option<WorkerYaml>,
    pub transcription: Option<TranscriptionYaml>,
    pub signals: Option<SignalsYaml>,
    pub security: Option<SecurityYaml>,
}

/// Server configuration from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ServerYaml {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub tls: Option<TlsYaml>,
}

/// TLS configuration from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct TlsYaml {
    pub cert_path: Option<String>,
    pub key_path: Option<String>,
}

/// Worker contract settings from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct WorkerYaml {
    pub secret: Option<String>,
    pub callback_base: Option<String>,
    pub allow_local_audio_fetch: Option<bool>,
    /// Deployment environment name, e.g. "production"
    pub environment: Option<String>,
}

/// Transcription provider settings from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct TranscriptionYaml {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub speech_models: Option<Vec<String>>,
    pub poll_interval_seconds: Option<u64>,
    pub poll_timeout_seconds: Option<u64>,
}

/// Signal extraction models from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct SignalsYaml {
    pub ner_model: Option<String>,
    pub english_ner_model: Option<String>,
    pub embedding_model: Option<String>,
    pub inference_base_url: Option<String>,
    pub inference_api_token: Option<String>,
}

/// Security settings from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct SecurityYaml {
    pub rate_limit_requests_per_second: Option<u32>,
    pub rate_limit_burst_size: Option<u32>,
}

impl YamlConfig {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or the YAML is malformed.
    pub fn from_file(path: &PathBuf) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;

        let config: YamlConfig = serde_yaml::from_str(&contents)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yaml_config_full() {
        let yaml = r#"
server:
  host: "127.0.0.1"
  port: 3001
worker:
  secret: "s"
  allow_local_audio_fetch: true
  environment: "production"
transcription:
  speech_models: ["universal-2", "slam-1"]
  poll_interval_seconds: 1
signals:
  inference_api_token: "hf_token"
security:
  rate_limit_burst_size: 5
"#;

        let config: YamlConfig = serde_yaml::from_str(yaml).unwrap();

        let server = config.server.unwrap();
        assert_eq!(server.host.as_deref(), Some("127.0.0.1"));
        assert_eq!(server.port, Some(3001));
        assert!(server.tls.is_none());

        let worker = config.worker.unwrap();
        assert_eq!(worker.allow_local_audio_fetch, Some(true));
        assert_eq!(worker.callback_base, None);

        let transcription = config.transcription.unwrap();
        assert_eq!(
            transcription.speech_models,
            Some(vec!["universal-2".to_string(), "slam-1".to_string()])
        );
        assert_eq!(transcription.poll_interval_seconds, Some(1));

        assert_eq!(
            config.signals.unwrap().inference_api_token.as_deref(),
            Some("hf_token")
        );
        assert_eq!(config.security.unwrap().rate_limit_burst_size, Some(5));
    }

    #[test]
    fn test_yaml_config_empty() {
        let config: YamlConfig = serde_yaml::from_str("{}").unwrap();
        assert!(config.server.is_none());
        assert!(config.worker.is_none());
    }
}
