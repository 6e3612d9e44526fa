use crate::domain::errors::DomainError;
use async_trait::async_trait;

/// Text-generation backend shared by every chain.
#[async_trait]
pub trait LlmService: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, DomainError>;
    fn model_name(&self) -> &str;
}
