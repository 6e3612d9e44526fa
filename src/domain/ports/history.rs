use crate::domain::{errors::DomainError, Message};
use async_trait::async_trait;

/// Ordered, append-only record of conversation turns.
#[async_trait]
pub trait ChatHistory: Send + Sync {
    async fn messages(&self) -> Result<Vec<Message>, DomainError>;
    async fn append(&self, messages: Vec<Message>) -> Result<(), DomainError>;
    async fn clear(&self) -> Result<(), DomainError>;
}
