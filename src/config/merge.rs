//! Merging of environment values (base) with YAML overrides.

use std::path::PathBuf;
use std::time::Duration;

use super::env::EnvConfig;
use super::validation::validate_tls_pair;
use super::yaml::YamlConfig;
use super::{ConfigError, WorkerConfig};

/// Trim a YAML string; blank counts as absent.
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub(super) fn merge_config(yaml: Option<YamlConfig>) -> Result<WorkerConfig, ConfigError> {
    let env = EnvConfig::load()?;
    let yaml = yaml.unwrap_or_default();

    let server = yaml.server.unwrap_or_default();
    let tls = server.tls.unwrap_or_default();
    let worker = yaml.worker.unwrap_or_default();
    let transcription = yaml.transcription.unwrap_or_default();
    let signals = yaml.signals.unwrap_or_default();
    let security = yaml.security.unwrap_or_default();

    let tls = validate_tls_pair(
        non_blank(tls.cert_path).map(PathBuf::from).or(env.tls_cert_path),
        non_blank(tls.key_path).map(PathBuf::from).or(env.tls_key_path),
    )?;

    let speech_models = transcription
        .speech_models
        .map(|models| {
            models
                .into_iter()
                .filter_map(|m| non_blank(Some(m)))
                .collect::<Vec<_>>()
        })
        .filter(|models| !models.is_empty())
        .unwrap_or(env.speech_models);

    let deployment_env = non_blank(worker.environment)
        .map(|e| e.to_lowercase())
        .unwrap_or(env.deployment_env);

    Ok(WorkerConfig {
        host: non_blank(server.host).unwrap_or(env.host),
        port: server.port.unwrap_or(env.port),
        tls,
        worker_secret: non_blank(worker.secret).or(env.worker_secret),
        api_callback_base: non_blank(worker.callback_base).unwrap_or(env.api_callback_base),
        assemblyai_api_key: non_blank(transcription.api_key).or(env.assemblyai_api_key),
        assemblyai_base_url: non_blank(transcription.base_url).unwrap_or(env.assemblyai_base_url),
        speech_models,
        poll_interval: Duration::from_secs(
            transcription
                .poll_interval_seconds
                .unwrap_or(env.poll_interval_seconds),
        ),
        poll_timeout: Duration::from_secs(
            transcription
                .poll_timeout_seconds
                .unwrap_or(env.poll_timeout_seconds),
        ),
        allow_local_audio_fetch: worker
            .allow_local_audio_fetch
            .unwrap_or(env.allow_local_audio_fetch),
        deployment_env,
        ner_model: non_blank(signals.ner_model).unwrap_or(env.ner_model),
        english_ner_model: non_blank(signals.english_ner_model).unwrap_or(env.english_ner_model),
        embedding_model: non_blank(signals.embedding_model).unwrap_or(env.embedding_model),
        inference_base_url: non_blank(signals.inference_base_url)
            .unwrap_or(env.inference_base_url),
        inference_api_token: non_blank(signals.inference_api_token).or(env.inference_api_token),
        rate_limit_requests_per_second: security
            .rate_limit_requests_per_second
            .unwrap_or(env.rate_limit_requests_per_second),
        rate_limit_burst_size: security
            .rate_limit_burst_size
            .unwrap_or(env.rate_limit_burst_size),
    })
}
