//! Embedding generation behind a single capability interface.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::EmbeddingError;
use crate::models::EmbeddingConfig;

/// Capability interface for producing embedding vectors.
///
/// Concrete providers implement this; everything downstream (batching,
/// indexing, search) only sees the trait.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a batch of texts. Returns one vector per input, in input
    /// order, each of exactly [`dimension`](Embedder::dimension) length.
    async fn embed(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>, EmbeddingError>;

    /// Embed a single search query.
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.embed(vec![text.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| EmbeddingError::InvalidResponse("empty embedding response".to_string()))
    }

    /// Fixed dimension of the produced vectors.
    fn dimension(&self) -> u32;
}

/// Request body for an OpenAI-compatible `/embeddings` endpoint.
#[derive(Debug, Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    input: &'a [String],
    dimensions: u32,
}

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingObject>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingObject {
    embedding: Vec<f32>,
    index: usize,
}

/// Client for an OpenAI-compatible embedding provider.
#[derive(Debug, Clone)]
pub struct HttpEmbedder {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
    dimension: u32,
    batch_size: usize,
}

impl HttpEmbedder {
    /// Create a new embedder. The API key must be present in the
    /// configuration (file or environment) or this fails.
    pub fn new(config: &EmbeddingConfig) -> Result<Self, EmbeddingError> {
        let api_key = config
            .api_key
            .clone()
            .ok_or(EmbeddingError::MissingApiKey)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| EmbeddingError::ConnectionError(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
            dimension: config.dimension,
            batch_size: config.batch_size.max(1) as usize,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn embed_single_batch(
        &self,
        texts: &[String],
    ) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let url = format!("{}/embeddings", self.base_url);
        let request = EmbeddingsRequest {
            model: &self.model,
            input: texts,
            dimensions: self.dimension,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    EmbeddingError::Timeout
                } else {
                    EmbeddingError::RequestError(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::ServerError {
                status: status.as_u16(),
                message,
            });
        }

        let body: EmbeddingsResponse = response
            .json()
            .await
            .map_err(|e| EmbeddingError::InvalidResponse(e.to_string()))?;

        if body.data.len() != texts.len() {
            return Err(EmbeddingError::InvalidResponse(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                body.data.len()
            )));
        }

        // The index field is authoritative for ordering
        let mut data = body.data;
        data.sort_by_key(|d| d.index);

        let mut vectors = Vec::with_capacity(data.len());
        for item in data {
            if item.embedding.len() != self.dimension as usize {
                return Err(EmbeddingError::DimensionMismatch {
                    expected: self.dimension,
                    actual: item.embedding.len(),
                });
            }
            vectors.push(item.embedding);
        }

        Ok(vectors)
    }
}

#[async_trait]
impl Embedder for HttpEmbedder {
    async fn embed(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let mut all_vectors = Vec::with_capacity(texts.len());
        for batch in texts.chunks(self.batch_size) {
            let vectors = self.embed_single_batch(batch).await?;
            all_vectors.extend(vectors);
        }

        Ok(all_vectors)
    }

    fn dimension(&self) -> u32 {
        self.dimension
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn test_config(url: &str, dimension: u32) -> EmbeddingConfig {
        EmbeddingConfig {
            url: url.to_string(),
            dimension,
            api_key: Some("test-key".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_api_key_is_config_error() {
        let config = EmbeddingConfig::default();
        assert!(matches!(
            HttpEmbedder::new(&config),
            Err(EmbeddingError::MissingApiKey)
        ));
    }

    #[test]
    fn test_base_url_trimming() {
        let embedder = HttpEmbedder::new(&test_config("https://api.openai.com/v1/", 512)).unwrap();
        assert_eq!(embedder.base_url(), "https://api.openai.com/v1");
    }

    #[tokio::test]
    async fn test_embed_returns_ordered_vectors() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/embeddings")
                    .header("authorization", "Bearer test-key");
                then.status(200).json_body(json!({
                    "data": [
                        {"embedding": [0.4, 0.5, 0.6, 0.7], "index": 1},
                        {"embedding": [0.0, 0.1, 0.2, 0.3], "index": 0}
                    ]
                }));
            })
            .await;

        let embedder = HttpEmbedder::new(&test_config(&server.base_url(), 4)).unwrap();
        let vectors = embedder
            .embed(vec!["first".to_string(), "second".to_string()])
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(vectors.len(), 2);
        assert_eq!(vectors[0], vec![0.0, 0.1, 0.2, 0.3]);
        assert_eq!(vectors[1], vec![0.4, 0.5, 0.6, 0.7]);
    }

    #[tokio::test]
    async fn test_embed_empty_input_skips_network() {
        let embedder = HttpEmbedder::new(&test_config("http://localhost:1", 4)).unwrap();
        let vectors = embedder.embed(Vec::new()).await.unwrap();
        assert!(vectors.is_empty());
    }

    #[tokio::test]
    async fn test_dimension_mismatch_is_rejected() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/embeddings");
                then.status(200).json_body(json!({
                    "data": [{"embedding": [0.1, 0.2], "index": 0}]
                }));
            })
            .await;

        let embedder = HttpEmbedder::new(&test_config(&server.base_url(), 4)).unwrap();
        match embedder.embed(vec!["text".to_string()]).await {
            Err(EmbeddingError::DimensionMismatch { expected, actual }) => {
                assert_eq!(expected, 4);
                assert_eq!(actual, 2);
            }
            other => panic!("expected dimension mismatch, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_server_error_carries_status() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/embeddings");
                then.status(429).body("rate limited");
            })
            .await;

        let embedder = HttpEmbedder::new(&test_config(&server.base_url(), 4)).unwrap();
        match embedder.embed_query("text").await {
            Err(EmbeddingError::ServerError { status, .. }) => assert_eq!(status, 429),
            other => panic!("expected server error, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_short_response_is_invalid() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/embeddings");
                then.status(200).json_body(json!({
                    "data": [{"embedding": [0.1, 0.2, 0.3, 0.4], "index": 0}]
                }));
            })
            .await;

        let embedder = HttpEmbedder::new(&test_config(&server.base_url(), 4)).unwrap();
        let result = embedder
            .embed(vec!["a".to_string(), "b".to_string()])
            .await;
        assert!(matches!(result, Err(EmbeddingError::InvalidResponse(_))));
    }
}
