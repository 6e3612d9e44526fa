use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::application::chains::{require_question, Chain, ChainPrompts};
use crate::domain::{
    ports::{ChatHistory, LlmService, Retriever},
    transcript, DomainError, Message, SearchResult,
};

/// Result of a grounded answer together with what it was grounded on.
#[derive(Debug, Clone, Serialize)]
pub struct ChainResponse {
    pub answer: String,
    /// The standalone question used for retrieval.
    pub generated_question: String,
    pub source_documents: Vec<SearchResult>,
}

/// Answers from retrieved documents plus conversation history.
///
/// With prior turns present, the follow-up question is first condensed into a
/// standalone question by the model; that question drives retrieval and the
/// final answer. The caller's original question is what lands in history.
pub struct ConversationalRetrievalChain {
    llm: Arc<dyn LlmService>,
    retriever: Arc<dyn Retriever>,
    history: Arc<dyn ChatHistory>,
    prompts: ChainPrompts,
    verbose: bool,
}

impl ConversationalRetrievalChain {
    pub fn new(
        llm: Arc<dyn LlmService>,
        retriever: Arc<dyn Retriever>,
        history: Arc<dyn ChatHistory>,
        prompts: ChainPrompts,
    ) -> Self {
        Self {
            llm,
            retriever,
            history,
            prompts,
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
    pub async fn answer_with_sources(&self, question: &str) -> Result<ChainResponse, DomainError> {
        let question = require_question(question)?;
        let history = self.history.messages().await?;

        let generated_question = if history.is_empty() {
            question.to_string()
        } else {
            self.condense(question, &history).await?
        };

        let source_documents = self.retriever.retrieve(&generated_question).await?;
        debug!(count = source_documents.len(), "retrieved documents");

        let context = source_documents
            .iter()
            .map(|r| r.document.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");

        let prompt = self.prompts.qa.render(&[
            ("context", context.as_str()),
            ("question", generated_question.as_str()),
        ]);
        if self.verbose {
            debug!(%prompt, "qa prompt");
        }

        let answer = self.llm.generate(&prompt).await?.trim().to_string();

        self.history
            .append(vec![Message::user(question), Message::assistant(&answer)])
            .await?;

        Ok(ChainResponse {
            answer,
            generated_question,
            source_documents,
        })
    }

    async fn condense(&self, question: &str, history: &[Message]) -> Result<String, DomainError> {
        let chat_history = transcript(history);
        let prompt = self.prompts.condense_question.render(&[
            ("chat_history", chat_history.as_str()),
            ("question", question),
        ]);
        if self.verbose {
            debug!(%prompt, "condense question prompt");
        }

        let standalone = self.llm.generate(&prompt).await?;
        let standalone = standalone.trim();

        // An empty rewrite would retrieve nothing useful.
        Ok(if standalone.is_empty() {
            question.to_string()
        } else {
            standalone.to_string()
        })
    }
}

#[async_trait]
impl Chain for ConversationalRetrievalChain {
    async fn answer(&self, question: &str) -> Result<String, DomainError> {
        self.answer_with_sources(question)
            .await
            .map(|response| response.answer)
    }
}
