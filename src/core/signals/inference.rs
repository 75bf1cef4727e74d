//! HTTP inference API adapters for the entity labelers and the embedder.
//!
//! Both model kinds are served by the same hosted inference endpoint:
//!
//! ```text
//! POST {base}/models/{model}   {"inputs": "...", "parameters": {...}}
//! ```
//!
//! Token classification answers with a list of entity groups; feature
//! extraction answers with either a sentence vector or a matrix of token
//! vectors, which is mean-pooled.

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use super::{Embedder, EntityLabeler, EntitySpan, SignalError};

/// Per-call timeout for inference requests.
pub const INFERENCE_TIMEOUT: Duration = Duration::from_secs(30);

/// Shared HTTP client for one inference endpoint.
#[derive(Clone)]
pub struct InferenceClient {
    http_client: Client,
    base_url: String,
    api_token: String,
}

#[derive(Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parameters: Option<LabelParameters>,
}

#[derive(Serialize)]
struct LabelParameters {
    aggregation_strategy: &'static str,
}

#[derive(Deserialize)]
struct LabeledGroup {
    #[serde(alias = "entity")]
    entity_group: String,
    #[serde(default)]
    word: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FeatureResponse {
    Sentence(Vec<f32>),
    Tokens(Vec<Vec<f32>>),
}

impl FeatureResponse {
    fn into_vector(self) -> Result<Vec<f32>, SignalError> {
        match self {
            FeatureResponse::Sentence(vector) => Ok(vector),
            FeatureResponse::Tokens(rows) => mean_pool(rows),
        }
    }
}

fn mean_pool(rows: Vec<Vec<f32>>) -> Result<Vec<f32>, SignalError> {
    let mut rows = rows.into_iter();
    let Some(mut sum) = rows.next() else {
        return Err(SignalError::InvalidResponse("empty embedding".to_string()));
    };
    let mut count = 1usize;

    for row in rows {
        if row.len() != sum.len() {
            return Err(SignalError::InvalidResponse(
                "embedding rows differ in length".to_string(),
            ));
        }
        for (acc, value) in sum.iter_mut().zip(row) {
            *acc += value;
        }
        count += 1;
    }

    if count > 1 {
        let n = count as f32;
        sum.iter_mut().for_each(|v| *v /= n);
    }
    Ok(sum)
}

impl InferenceClient {
    pub fn new(base_url: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_token: api_token.into(),
        }
    }

    pub fn model_url(&self, model: &str) -> String {
        format!("{}/models/{}", self.base_url, model)
    }

    async fn post(
        &self,
        model: &str,
        body: &InferenceRequest<'_>,
    ) -> Result<Response, SignalError> {
        let response = self
            .http_client
            .post(self.model_url(model))
            .header("Authorization", format!("Bearer {}", self.api_token))
            .timeout(INFERENCE_TIMEOUT)
            .json(body)
            .send()
            .await
            .map_err(|e| SignalError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::SERVICE_UNAVAILABLE {
            return Err(SignalError::RequestFailed(format!("model {model} is loading")));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SignalError::RequestFailed(format!("HTTP {status}: {body}")));
        }
        Ok(response)
    }
}

/// Token-classification model reached over the inference API.
pub struct InferenceLabeler {
    client: Arc<InferenceClient>,
    model: String,
}

impl InferenceLabeler {
    pub fn new(client: Arc<InferenceClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }
}

#[async_trait]
impl EntityLabeler for InferenceLabeler {
    async fn label(&self, text: &str) -> Result<Vec<EntitySpan>, SignalError> {
        let request = InferenceRequest {
            inputs: text,
            parameters: Some(LabelParameters {
                aggregation_strategy: "simple",
            }),
        };

        let groups: Vec<LabeledGroup> = self
            .client
            .post(&self.model, &request)
            .await?
            .json()
            .await
            .map_err(|e| SignalError::InvalidResponse(e.to_string()))?;

        debug!(model = %self.model, groups = groups.len(), "Labeler response received");
        Ok(groups
            .into_iter()
            .map(|g| EntitySpan::new(g.entity_group, g.word))
            .collect())
    }
}

/// Feature-extraction model reached over the inference API.
pub struct InferenceEmbedder {
    client: Arc<InferenceClient>,
    model: String,
}

impl InferenceEmbedder {
    pub fn new(client: Arc<InferenceClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }
}

#[async_trait]
impl Embedder for InferenceEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, SignalError> {
        let request = InferenceRequest {
            inputs: text,
            parameters: None,
        };

        let features: FeatureResponse = self
            .client
            .post(&self.model, &request)
            .await?
            .json()
            .await
            .map_err(|e| SignalError::InvalidResponse(e.to_string()))?;

        features.into_vector()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client_for(server: &MockServer) -> Arc<InferenceClient> {
        Arc::new(InferenceClient::new(format!("{}/", server.uri()), "hf_test"))
    }

    #[test]
    fn test_model_url_strips_trailing_slash() {
        let client = InferenceClient::new("https://router.example/hf-inference/", "t");
        assert_eq!(
            client.model_url("dslim/bert-base-NER"),
            "https://router.example/hf-inference/models/dslim/bert-base-NER"
        );
    }

    #[test]
    fn test_mean_pool() {
        let pooled = mean_pool(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        assert_eq!(pooled, vec![2.0, 3.0]);
        assert!(mean_pool(vec![]).is_err());
        assert!(mean_pool(vec![vec![1.0], vec![1.0, 2.0]]).is_err());
    }

    #[tokio::test]
    async fn test_labeler_requests_simple_aggregation() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/dslim/bert-base-NER"))
            .and(header("authorization", "Bearer hf_test"))
            .and(body_json(json!({
                "inputs": "Anna lived in Porto",
                "parameters": {"aggregation_strategy": "simple"}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"entity_group": "PER", "word": "Anna", "score": 0.99, "start": 0, "end": 4},
                {"entity": "LOC", "word": "Porto", "score": 0.97}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let labeler = InferenceLabeler::new(client_for(&server).await, "dslim/bert-base-NER");
        let spans = labeler.label("Anna lived in Porto").await.unwrap();

        assert_eq!(
            spans,
            vec![EntitySpan::new("PER", "Anna"), EntitySpan::new("LOC", "Porto")]
        );
    }

    #[tokio::test]
    async fn test_labeler_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let labeler = InferenceLabeler::new(client_for(&server).await, "ner");
        let err = labeler.label("text").await.unwrap_err();
        assert!(matches!(err, SignalError::RequestFailed(_)));
    }

    #[tokio::test]
    async fn test_embedder_accepts_sentence_vector() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/all-MiniLM"))
            .and(body_json(json!({"inputs": "hello"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([0.5, -0.25, 1.0])))
            .mount(&server)
            .await;

        let embedder = InferenceEmbedder::new(client_for(&server).await, "all-MiniLM");
        assert_eq!(embedder.embed("hello").await.unwrap(), vec![0.5, -0.25, 1.0]);
    }

    #[tokio::test]
    async fn test_embedder_pools_token_matrix() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([[1.0, 0.0], [0.0, 1.0]])),
            )
            .mount(&server)
            .await;

        let embedder = InferenceEmbedder::new(client_for(&server).await, "all-MiniLM");
        assert_eq!(embedder.embed("hello").await.unwrap(), vec![0.5, 0.5]);
    }

    #[tokio::test]
    async fn test_embedder_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"error": "boom"})))
            .mount(&server)
            .await;

        let embedder = InferenceEmbedder::new(client_for(&server).await, "all-MiniLM");
        let err = embedder.embed("hello").await.unwrap_err();
        assert!(matches!(err, SignalError::InvalidResponse(_)));
    }
}
