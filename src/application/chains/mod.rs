//! Prompt-formatting, retrieval and model-invocation sequences.

mod conversation;
mod prompts;
mod retrieval;

use async_trait::async_trait;

use crate::domain::DomainError;

pub use conversation::ConversationChain;
pub use prompts::{ChainPrompts, CONDENSE_QUESTION_TEMPLATE, CONVERSATION_TEMPLATE, QA_TEMPLATE};
pub use retrieval::{ChainResponse, ConversationalRetrievalChain};

/// A composed question-answering pipeline.
#[async_trait]
pub trait Chain: Send + Sync {
    /// Answers `question` and records the exchange in the chain's history.
    async fn answer(&self, question: &str) -> Result<String, DomainError>;
}

fn require_question(question: &str) -> Result<&str, DomainError> {
    let question = question.trim();
    if question.is_empty() {
        return Err(DomainError::validation("question must not be empty"));
    }
    Ok(question)
}
