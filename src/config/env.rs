//! Environment variable loading.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use super::{
    ConfigError, DEFAULT_CALLBACK_BASE, DEFAULT_EMBEDDING_MODEL, DEFAULT_ENGLISH_NER_MODEL,
    DEFAULT_INFERENCE_BASE_URL, DEFAULT_NER_MODEL,
};
use crate::core::transcription::assemblyai::config::{DEFAULT_BASE_URL, DEFAULT_SPEECH_MODEL};

/// Some secret stores write the first key of an exported file with a UTF-8
/// byte order mark glued to its name.
const BOM_WORKER_SECRET: &str = "\u{feff}WORKER_SECRET";

/// Configuration values read from the environment, with defaults applied.
#[derive(Debug, Clone)]
pub(super) struct EnvConfig {
    pub host: String,
    pub port: u16,
    pub tls_cert_path: Option<PathBuf>,
    pub tls_key_path: Option<PathBuf>,
    pub worker_secret: Option<String>,
    pub api_callback_base: String,
    pub assemblyai_api_key: Option<String>,
    pub assemblyai_base_url: String,
    pub speech_models: Vec<String>,
    pub poll_interval_seconds: u64,
    pub poll_timeout_seconds: u64,
    pub allow_local_audio_fetch: bool,
    pub deployment_env: String,
    pub ner_model: String,
    pub english_ner_model: String,
    pub embedding_model: String,
    pub inference_base_url: String,
    pub inference_api_token: Option<String>,
    pub rate_limit_requests_per_second: u32,
    pub rate_limit_burst_size: u32,
}

impl EnvConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let speech_models = env_var("ASSEMBLYAI_SPEECH_MODELS")
            .map(|raw| split_list(&raw))
            .filter(|models| !models.is_empty())
            .unwrap_or_else(|| vec![DEFAULT_SPEECH_MODEL.to_string()]);

        let deployment_env = env_var("VERCEL_ENV")
            .or_else(|| env_var("NODE_ENV"))
            .unwrap_or_default()
            .to_lowercase();

        Ok(Self {
            host: env_var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_env("PORT", 8000)?,
            tls_cert_path: env_var("TLS_CERT_PATH").map(PathBuf::from),
            tls_key_path: env_var("TLS_KEY_PATH").map(PathBuf::from),
            worker_secret: env_var("WORKER_SECRET").or_else(|| env_var(BOM_WORKER_SECRET)),
            api_callback_base: env_var("API_CALLBACK_BASE")
                .unwrap_or_else(|| DEFAULT_CALLBACK_BASE.to_string()),
            assemblyai_api_key: env_var("ASSEMBLYAI_API_KEY"),
            assemblyai_base_url: env_var("ASSEMBLYAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            speech_models,
            poll_interval_seconds: parse_env("POLL_INTERVAL_SECONDS", 2)?,
            poll_timeout_seconds: parse_env("POLL_TIMEOUT_SECONDS", 600)?,
            allow_local_audio_fetch: env_flag("ALLOW_LOCAL_AUDIO_FETCH"),
            deployment_env,
            ner_model: env_var("NER_MODEL").unwrap_or_else(|| DEFAULT_NER_MODEL.to_string()),
            english_ner_model: env_var("ENGLISH_NER_MODEL")
                .unwrap_or_else(|| DEFAULT_ENGLISH_NER_MODEL.to_string()),
            embedding_model: env_var("EMBEDDING_MODEL")
                .unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string()),
            inference_base_url: env_var("INFERENCE_BASE_URL")
                .unwrap_or_else(|| DEFAULT_INFERENCE_BASE_URL.to_string()),
            inference_api_token: env_var("INFERENCE_API_TOKEN"),
            rate_limit_requests_per_second: parse_env("RATE_LIMIT_REQUESTS_PER_SECOND", 100_000)?,
            rate_limit_burst_size: parse_env("RATE_LIMIT_BURST_SIZE", 100)?,
        })
    }
}

/// Trimmed value of `name`; empty counts as unset.
pub(super) fn env_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T: FromStr>(name: &str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match env_var(name) {
        Some(raw) => raw.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            name: name.to_string(),
            message: format!("{raw:?}: {e}"),
        }),
        None => Ok(default),
    }
}

/// `true` (any case) enables; everything else disables.
fn env_flag(name: &str) -> bool {
    env_var(name).is_some_and(|v| v.eq_ignore_ascii_case("true"))
}

/// Split a comma separated list, dropping blank entries.
pub(super) fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
