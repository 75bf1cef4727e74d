//! Configuration module for the Talesync worker
//!
//! This module handles worker configuration from various sources: .env files, YAML files,
//! and environment variables. Priority: YAML > ENV vars > .env values > defaults.
//! The configuration is loaded once at startup and shared read-only afterwards.
//!
//! # Modules
//! - `yaml`: YAML configuration file loading
//! - `env`: Environment variable loading
//! - `merge`: Merging YAML and environment configurations
//! - `validation`: Configuration validation logic
//!
//! # Example
//! ```rust,no_run
//! use talesync_worker::config::WorkerConfig;
//! use std::path::PathBuf;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Load from environment variables only
//! let config = WorkerConfig::from_env()?;
//!
//! // Load from YAML file with environment variable overrides
//! let config_path = PathBuf::from("config.yaml");
//! let config = WorkerConfig::from_file(&config_path)?;
//!
//! println!("Worker listening on {}", config.address());
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

mod env;
mod merge;
mod validation;
mod yaml;

pub use yaml::YamlConfig;

use crate::core::staging::StagingPolicy;
use crate::core::transcription::AssemblyAIConfig;

/// Default callback base URL of the API.
pub const DEFAULT_CALLBACK_BASE: &str = "http://localhost:8080/api/uploads/worker-callback";
/// Default multilingual token-classification model.
pub const DEFAULT_NER_MODEL: &str = "Babelscape/wikineural-multilingual-ner";
/// Default English token-classification model.
pub const DEFAULT_ENGLISH_NER_MODEL: &str = "tner/roberta-large-ontonotes5";
/// Default sentence embedding model.
pub const DEFAULT_EMBEDDING_MODEL: &str = "sentence-transformers/all-MiniLM-L6-v2";
/// Default hosted inference endpoint.
pub const DEFAULT_INFERENCE_BASE_URL: &str = "https://router.huggingface.co/hf-inference";
/// Rate limits at or above this value disable the limiter.
pub const RATE_LIMIT_DISABLED_THRESHOLD: u32 = 100_000;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse YAML config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },

    #[error("{0}")]
    Invalid(String),
}

/// TLS configuration for HTTPS
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsConfig {
    /// Path to the TLS certificate file (PEM format)
    pub cert_path: PathBuf,
    /// Path to the TLS private key file (PEM format)
    pub key_path: PathBuf,
}

/// Worker configuration
///
/// Contains everything needed to run the worker:
/// - Server settings (host, port, TLS)
/// - Shared worker secret and callback target
/// - Transcription provider settings
/// - Signal extraction models
/// - Security settings (rate limiting)
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    // Server settings
    pub host: String,
    pub port: u16,

    // TLS configuration (optional)
    pub tls: Option<TlsConfig>,

    // Worker contract
    /// Shared secret expected in `x-worker-secret` and sent on callbacks.
    /// `None` rejects every `/process` call.
    pub worker_secret: Option<String>,
    /// Base URL the memory id is appended to for callbacks
    pub api_callback_base: String,

    // Transcription provider
    pub assemblyai_api_key: Option<String>,
    pub assemblyai_base_url: String,
    pub speech_models: Vec<String>,
    pub poll_interval: Duration,
    pub poll_timeout: Duration,

    // Staging policy
    /// Fetch private/local audio even in production
    pub allow_local_audio_fetch: bool,
    /// Lowercased deployment environment (`VERCEL_ENV`, then `NODE_ENV`)
    pub deployment_env: String,

    // Signal extraction
    pub ner_model: String,
    pub english_ner_model: String,
    pub embedding_model: String,
    pub inference_base_url: String,
    pub inference_api_token: Option<String>,

    // Rate limiting configuration
    /// Maximum requests per second per IP address
    /// Default: 100000 (disabled)
    pub rate_limit_requests_per_second: u32,
    /// Maximum burst size for rate limiting
    /// Default: 100
    pub rate_limit_burst_size: u32,
}

/// Implement Drop to zeroize all secret fields when WorkerConfig is dropped.
impl Drop for WorkerConfig {
    fn drop(&mut self) {
        use zeroize::Zeroize;

        if let Some(ref mut secret) = self.worker_secret {
            secret.zeroize();
        }
        if let Some(ref mut key) = self.assemblyai_api_key {
            key.zeroize();
        }
        if let Some(ref mut token) = self.inference_api_token {
            token.zeroize();
        }
    }
}

impl WorkerConfig {
    /// Load configuration from environment variables only
    ///
    /// The `.env` file is loaded into the process environment by `main` before
    /// this is called, so real environment variables win over `.env` values.
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = merge::merge_config(None)?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a YAML file with environment variable base
    ///
    /// Priority order (highest to lowest):
    /// 1. YAML file values
    /// 2. Environment variables (actual ENV vars override .env values)
    /// 3. .env file values
    /// 4. Default values
    ///
    /// # Errors
    /// Returns an error if:
    /// - The YAML file cannot be read or is malformed
    /// - Environment variables have invalid formats
    /// - Configuration validation fails
    pub fn from_file(path: &PathBuf) -> Result<Self, ConfigError> {
        let yaml_config = yaml::YamlConfig::from_file(path)?;
        let config = merge::merge_config(Some(yaml_config))?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Get the server address as a string
    ///
    /// Returns the address in the format "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Check if TLS is enabled
    pub fn is_tls_enabled(&self) -> bool {
        self.tls.is_some()
    }

    pub fn is_production(&self) -> bool {
        self.deployment_env == "production"
    }

    pub fn has_worker_secret(&self) -> bool {
        self.worker_secret.as_deref().is_some_and(|s| !s.is_empty())
    }

    pub fn is_rate_limit_enabled(&self) -> bool {
        self.rate_limit_requests_per_second < RATE_LIMIT_DISABLED_THRESHOLD
    }

    pub fn staging_policy(&self) -> StagingPolicy {
        StagingPolicy {
            allow_local_fetch: self.allow_local_audio_fetch,
            is_production: self.is_production(),
        }
    }

    /// Provider settings, or `None` when no API key is configured.
    pub fn assemblyai_config(&self) -> Option<AssemblyAIConfig> {
        let api_key = self
            .assemblyai_api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())?;

        let mut config = AssemblyAIConfig::new(api_key)
            .with_base_url(self.assemblyai_base_url.clone())
            .with_poll_interval(self.poll_interval)
            .with_poll_timeout(self.poll_timeout);
        config.speech_models = self.speech_models.clone();
        Some(config)
    }
}
