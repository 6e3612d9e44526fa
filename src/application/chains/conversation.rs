use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::application::chains::{require_question, Chain};
use crate::domain::{
    ports::{ChatHistory, LlmService},
    transcript, DomainError, Message, PromptTemplate,
};

/// Answers from conversation history and the model alone.
pub struct ConversationChain {
    llm: Arc<dyn LlmService>,
    history: Arc<dyn ChatHistory>,
    prompt: PromptTemplate,
    verbose: bool,
}

impl ConversationChain {
    pub fn new(llm: Arc<dyn LlmService>, history: Arc<dyn ChatHistory>, prompt: PromptTemplate) -> Self {
        Self {
            llm,
            history,
            prompt,
            verbose: false,
        }
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn history(&self) -> &Arc<dyn ChatHistory> {
        &self.history
    }

    #[instrument(skip(self, question), fields(model = self.llm.model_name()))]
    async fn respond(&self, question: &str) -> Result<String, DomainError> {
        let question = require_question(question)?;
        let history = transcript(&self.history.messages().await?);
        let prompt = self
            .prompt
            .render(&[("history", history.as_str()), ("input", question)]);
        if self.verbose {
            debug!(%prompt, "conversation prompt");
        }

        let answer = self.llm.generate(&prompt).await?.trim().to_string();

        self.history
            .append(vec![Message::user(question), Message::assistant(&answer)])
            .await?;

        Ok(answer)
    }
}

#[async_trait]
impl Chain for ConversationChain {
    async fn answer(&self, question: &str) -> Result<String, DomainError> {
        self.respond(question).await
    }
}
