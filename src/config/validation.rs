//! Configuration validation logic.

use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;
use url::Url;

use super::{ConfigError, TlsConfig, WorkerConfig};

/// Upper bound for `POLL_TIMEOUT_SECONDS`.
pub const MAX_POLL_TIMEOUT: Duration = Duration::from_secs(24 * 60 * 60);

/// Validate a merged configuration.
///
/// A missing worker secret is allowed: the worker still starts and rejects
/// every `/process` call.
pub(super) fn validate(config: &WorkerConfig) -> Result<(), ConfigError> {
    validate_poll_window(config)?;
    validate_http_url("API_CALLBACK_BASE", &config.api_callback_base)?;
    validate_http_url("ASSEMBLYAI_BASE_URL", &config.assemblyai_base_url)?;
    validate_http_url("INFERENCE_BASE_URL", &config.inference_base_url)?;

    if config.rate_limit_requests_per_second == 0 || config.rate_limit_burst_size == 0 {
        return Err(ConfigError::Invalid(
            "Rate limit values must be greater than zero".to_string(),
        ));
    }

    if !config.has_worker_secret() {
        warn!("WORKER_SECRET is not set; every /process request will be rejected");
    }
    Ok(())
}

fn validate_poll_window(config: &WorkerConfig) -> Result<(), ConfigError> {
    if config.poll_interval.is_zero() {
        return Err(ConfigError::InvalidValue {
            name: "POLL_INTERVAL_SECONDS".to_string(),
            message: "must be greater than zero".to_string(),
        });
    }
    if config.poll_timeout < config.poll_interval {
        return Err(ConfigError::InvalidValue {
            name: "POLL_TIMEOUT_SECONDS".to_string(),
            message: "must not be shorter than the poll interval".to_string(),
        });
    }
    if config.poll_timeout > MAX_POLL_TIMEOUT {
        return Err(ConfigError::InvalidValue {
            name: "POLL_TIMEOUT_SECONDS".to_string(),
            message: format!("must not exceed {} seconds", MAX_POLL_TIMEOUT.as_secs()),
        });
    }
    Ok(())
}

fn validate_http_url(name: &str, value: &str) -> Result<(), ConfigError> {
    let invalid = |message: String| ConfigError::InvalidValue {
        name: name.to_string(),
        message,
    };

    let url = Url::parse(value).map_err(|e| invalid(format!("{value:?}: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme {:?}", url.scheme())));
    }
    if url.host_str().is_none() {
        return Err(invalid("missing host".to_string()));
    }
    Ok(())
}

/// TLS needs both a certificate and a key, or neither.
pub(super) fn validate_tls_pair(
    cert_path: Option<PathBuf>,
    key_path: Option<PathBuf>,
) -> Result<Option<TlsConfig>, ConfigError> {
    match (cert_path, key_path) {
        (Some(cert_path), Some(key_path)) => Ok(Some(TlsConfig {
            cert_path,
            key_path,
        })),
        (None, None) => Ok(None),
        (Some(_), None) => Err(ConfigError::Invalid(
            "TLS_CERT_PATH is set but TLS_KEY_PATH is missing".to_string(),
        )),
        (None, Some(_)) => Err(ConfigError::Invalid(
            "TLS_KEY_PATH is set but TLS_CERT_PATH is missing".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_http_url() {
        assert!(validate_http_url("X", "https://api.example.com/cb").is_ok());
        assert!(validate_http_url("X", "http://localhost:8080").is_ok());

        let err = validate_http_url("API_CALLBACK_BASE", "ftp://example.com").unwrap_err();
        assert!(err.to_string().contains("API_CALLBACK_BASE"));
        assert!(validate_http_url("X", "not a url").is_err());
    }

    #[test]
    fn test_validate_tls_pair() {
        assert_eq!(validate_tls_pair(None, None).unwrap(), None);
        assert!(
            validate_tls_pair(Some("c.pem".into()), Some("k.pem".into()))
                .unwrap()
                .is_some()
        );
        assert!(validate_tls_pair(None, Some("k.pem".into())).is_err());
    }
}
