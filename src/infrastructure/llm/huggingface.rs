use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::domain::{ports::LlmService, DomainError};
use crate::infrastructure::config::LlmConfig;
use crate::infrastructure::hub::{HubClient, RequestOptions};

#[derive(Debug, Clone, Default, Serialize)]
pub struct GenerationParameters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_new_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

#[derive(Serialize)]
struct GenerationRequest<'a> {
    inputs: &'a str,
    parameters: &'a GenerationParameters,
    options: RequestOptions,
}

#[derive(Deserialize)]
struct Generation {
    generated_text: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum GenerationResponse {
    Many(Vec<Generation>),
    One(Generation),
}

/// Text generation against a hosted model repository.
pub struct HubLlm {
    client: Arc<HubClient>,
    model: String,
    parameters: GenerationParameters,
    stop: Vec<String>,
}

impl HubLlm {
    pub fn new(client: Arc<HubClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            parameters: GenerationParameters::default(),
            stop: Vec::new(),
        }
    }

    pub fn from_config(client: Arc<HubClient>, config: &LlmConfig) -> Self {
        Self::new(client, &config.model)
            .with_parameters(GenerationParameters {
                max_new_tokens: config.max_new_tokens,
                temperature: config.temperature,
            })
            .with_stop(config.stop.clone())
    }

    pub fn with_parameters(mut self, parameters: GenerationParameters) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn with_stop(mut self, stop: Vec<String>) -> Self {
        self.stop = stop;
        self
    }
}

/// Drops an echoed prompt and cuts the text at the earliest stop sequence.
fn postprocess(prompt: &str, generated: &str, stop: &[String]) -> String {
    let text = generated.strip_prefix(prompt).unwrap_or(generated);
    let cut = stop
        .iter()
        .filter(|s| !s.is_empty())
        .filter_map(|s| text.find(s.as_str()))
        .min()
        .unwrap_or(text.len());
    text[..cut].to_string()
}

#[async_trait]
impl LlmService for HubLlm {
    async fn generate(&self, prompt: &str) -> Result<String, DomainError> {
        let request = GenerationRequest {
            inputs: prompt,
            parameters: &self.parameters,
            options: self.client.options(),
        };

        let response: GenerationResponse = self
            .client
            .post_json(&format!("models/{}", self.model), &request)
            .await?;

        let generation = match response {
            GenerationResponse::Many(generations) => generations
                .into_iter()
                .next()
                .ok_or_else(|| DomainError::external("model returned no generations"))?,
            GenerationResponse::One(generation) => generation,
        };

        Ok(postprocess(prompt, &generation.generated_text, &self.stop))
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

    fn client(base_url: String) -> Arc<HubClient> {
        let config = HubConfig {
            base_url,
            ..HubConfig::default()
        };
        Arc::new(HubClient::new(&config, HubCredential::new("hf_test").unwrap()).unwrap())
    }

    #[test]
    fn test_postprocess_strips_echo_and_stops() {
        let stop = vec!["\nHuman:".to_string()];

        assert_eq!(
            postprocess("Q: hi\nAI:", "Q: hi\nAI: Hello!\nHuman: more", &stop),
            " Hello!"
        );
        assert_eq!(postprocess("prompt", "fresh text", &[]), "fresh text");
    }

    #[tokio::test]
    async fn test_generate_posts_prompt_with_bearer_token() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/models/bigscience/bloom")
            .match_header("authorization", "Bearer hf_test")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "inputs": "Hello",
                "parameters": { "max_new_tokens": 16 }
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"generated_text":"Hello there"}]"#)
            .create_async()
            .await;

        let llm = HubLlm::new(client(server.url()), "bigscience/bloom").with_parameters(
            GenerationParameters {
                max_new_tokens: Some(16),
                temperature: None,
            },
        );

        let text = llm.generate("Hello").await.unwrap();

        assert_eq!(text, " there");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_generate_surfaces_remote_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/models/bigscience/bloom")
            .with_status(503)
            .with_body(r#"{"error":"Model bigscience/bloom is currently loading"}"#)
            .create_async()
            .await;

        let llm = HubLlm::new(client(server.url()), "bigscience/bloom");

        let err = llm.generate("Hello").await.unwrap_err();

        assert!(matches!(err, DomainError::ExternalService(msg) if msg.contains("currently loading")));
    }
}
