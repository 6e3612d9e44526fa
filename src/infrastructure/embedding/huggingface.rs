use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

use crate::domain::{ports::EmbeddingService, DomainError, Embedding};
use crate::infrastructure::config::EmbeddingConfig;
use crate::infrastructure::hub::{HubClient, RequestOptions};

#[derive(Serialize)]
struct FeatureExtractionRequest {
    inputs: Vec<String>,
    options: RequestOptions,
}

/// Sentence embeddings from the hosted feature-extraction pipeline.
pub struct HubEmbedding {
    client: Arc<HubClient>,
    model: String,
}

impl HubEmbedding {
    pub fn new(client: Arc<HubClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    pub fn from_config(client: Arc<HubClient>, config: &EmbeddingConfig) -> Self {
        Self::new(client, &config.model)
    }
}

#[async_trait]
impl EmbeddingService for HubEmbedding {
    async fn embed(&self, text: &str) -> Result<Embedding, DomainError> {
        self.embed_batch(&[text])
            .await?
            .pop()
            .ok_or_else(|| DomainError::external("No embedding returned"))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, DomainError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let request = FeatureExtractionRequest {
            inputs: texts.iter().map(|t| t.replace('\n', " ")).collect(),
            options: self.client.options(),
        };

        let vectors: Vec<Vec<f32>> = self
            .client
            .post_json(&format!("pipeline/feature-extraction/{}", self.model), &request)
            .await?;

        Ok(vectors.into_iter().map(Embedding::new).collect())
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::config::HubConfig;
    use crate::infrastructure::hub::HubCredential;

    const MODEL: &str = "sentence-transformers/all-mpnet-base-v2";

    fn embedding(base_url: String) -> HubEmbedding {
        let config = HubConfig {
            base_url,
            ..HubConfig::default()
        };
        let client = HubClient::new(&config, HubCredential::new("hf_test").unwrap()).unwrap();
        HubEmbedding::new(Arc::new(client), MODEL)
    }

    #[tokio::test]
    async fn test_embed_batch_flattens_newlines() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", format!("/pipeline/feature-extraction/{MODEL}").as_str())
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "inputs": ["line one line two", "other"],
                "options": { "wait_for_model": true }
            })))
            .with_status(200)
            .with_body("[[0.1, 0.2], [0.3, 0.4]]")
            .create_async()
            .await;

        let vectors = embedding(server.url())
            .embed_batch(&["line one\nline two", "other"])
            .await
            .unwrap();

        assert_eq!(vectors.len(), 2);
        assert_eq!(vectors[1].as_slice(), &[0.3, 0.4]);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_empty_batch_makes_no_request() {
        let server = mockito::Server::new_async().await;

        let vectors = embedding(server.url()).embed_batch(&[]).await.unwrap();

        assert!(vectors.is_empty());
    }

    #[tokio::test]
    async fn test_unauthorized_is_external_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", format!("/pipeline/feature-extraction/{MODEL}").as_str())
            .with_status(401)
            .with_body(r#"{"error":"Invalid credentials in Authorization header"}"#)
            .create_async()
            .await;

        let err = embedding(server.url()).embed("hello").await.unwrap_err();

        assert!(matches!(err, DomainError::ExternalService(msg) if msg.contains("Invalid credentials")));
    }
}
