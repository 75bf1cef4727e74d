//! Delivery of processing results back to the API.
//!
//! One POST per request to `{callback_base}/{memory_id}`, authenticated with
//! the shared worker secret. There is no retry: a non-2xx answer is returned
//! to the caller, which decides whether it matters.

use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};
use url::Url;
use zeroize::Zeroizing;

use crate::core::types::CallbackPayload;

/// Header carrying the shared secret on both inbound and callback requests.
pub const WORKER_SECRET_HEADER: &str = "x-worker-secret";

/// Timeout for the callback POST.
pub const CALLBACK_TIMEOUT: Duration = Duration::from_secs(60);

/// Errors raised while delivering a callback
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("Invalid callback base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("Callback request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Callback rejected: HTTP {status}")]
    Rejected { status: reqwest::StatusCode },
}

/// Posts callback payloads to the API.
pub struct CallbackDispatcher {
    base_url: Url,
    secret: Zeroizing<String>,
    timeout: Duration,
    client: Client,
}

impl CallbackDispatcher {
    pub fn new(base_url: &str, secret: impl Into<String>) -> Result<Self, DeliveryError> {
        let base_url = Url::parse(base_url.trim())
            .map_err(|e| DeliveryError::InvalidBaseUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(DeliveryError::InvalidBaseUrl(base_url.to_string()));
        }

        Ok(Self {
            base_url,
            secret: Zeroizing::new(secret.into()),
            timeout: CALLBACK_TIMEOUT,
            client: Client::new(),
        })
    }

    /// Callback URL for `memory_id`, appended as one percent-encoded segment.
    pub fn callback_url(&self, memory_id: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(memory_id);
        }
        url
    }

    /// POST `payload` for `memory_id`. Non-2xx answers are errors.
    pub async fn deliver(
        &self,
        memory_id: &str,
        payload: &CallbackPayload,
    ) -> Result<(), DeliveryError> {
        let url = self.callback_url(memory_id);
        debug!(memory_id = %memory_id, status = ?payload.status, "Delivering callback");

        let response = self
            .client
            .post(url)
            .header(WORKER_SECRET_HEADER, self.secret.as_str())
            .timeout(self.timeout)
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DeliveryError::Rejected { status });
        }

        info!(memory_id = %memory_id, status = ?payload.status, "Callback delivered");
        Ok(())
    }
}
