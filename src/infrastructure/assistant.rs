use std::sync::Arc;
use tracing::{info, instrument};

use crate::application::{
    ChainPrompts, ConversationChain, ConversationalRetrievalChain, VectorStoreRetriever,
};
use crate::domain::{
    ports::{ChatHistory, EmbeddingService, LlmService},
    Document, DomainError,
};
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::embedding::HubEmbedding;
use crate::infrastructure::history::InMemoryChatHistory;
use crate::infrastructure::hub::{HubClient, HubCredential};
use crate::infrastructure::llm::HubLlm;
use crate::infrastructure::vector_store::InMemoryVectorStore;

/// Knobs shared by every chain an [`Assistant`] builds.
#[derive(Debug, Clone)]
pub struct ChainSettings {
    pub prompts: ChainPrompts,
    pub top_k: usize,
    pub verbose: bool,
}

impl Default for ChainSettings {
    fn default() -> Self {
        Self {
            prompts: ChainPrompts::default(),
            top_k: 4,
            verbose: false,
        }
    }
}

/// Holds the model client, the embedding client and one conversation
/// history, and builds chains that all share that history.
pub struct Assistant {
    llm: Arc<dyn LlmService>,
    embedding: Arc<dyn EmbeddingService>,
    history: Arc<dyn ChatHistory>,
    settings: ChainSettings,
}

impl Assistant {
    pub fn new(
        llm: Arc<dyn LlmService>,
        embedding: Arc<dyn EmbeddingService>,
        history: Arc<dyn ChatHistory>,
        settings: ChainSettings,
    ) -> Self {
        Self {
            llm,
            embedding,
            history,
            settings,
        }
    }

    /// Wires the hosted model and embedding endpoints with an explicit
    /// credential. Makes no network calls.
    pub fn from_config(config: &AppConfig, credential: HubCredential) -> Result<Self, DomainError> {
        let client = Arc::new(HubClient::new(&config.config.hub, credential)?);
        let llm = HubLlm::from_config(client.clone(), &config.config.llm);
        let embedding = HubEmbedding::from_config(client, &config.config.embedding);

        info!(
            model = %config.config.llm.model,
            embedding_model = %config.config.embedding.model,
            "assistant configured"
        );

        Ok(Self::new(
            Arc::new(llm),
            Arc::new(embedding),
            Arc::new(InMemoryChatHistory::new()),
            ChainSettings {
                prompts: config.prompts.clone(),
                top_k: config.config.retrieval.top_k,
                verbose: config.config.verbose,
            },
        ))
    }

    pub fn history(&self) -> Arc<dyn ChatHistory> {
        self.history.clone()
    }

    pub fn settings(&self) -> &ChainSettings {
        &self.settings
    }

    /// Embeds `documents` into a fresh index and returns a chain that
    /// answers from it. The index lives as long as the returned chain.
    #[instrument(skip(self, documents), fields(count = documents.len()))]
    pub async fn build_grounded_chain(
        &self,
        documents: Vec<Document>,
    ) -> Result<ConversationalRetrievalChain, DomainError> {
        if documents.is_empty() {
            return Err(DomainError::validation(
                "cannot build a grounded chain from an empty document set",
            ));
        }

        let retriever = VectorStoreRetriever::new(
            self.embedding.clone(),
            Arc::new(InMemoryVectorStore::new()),
            self.settings.top_k,
        );
        retriever.index_documents(&documents).await?;
        info!(count = documents.len(), "similarity index built");

        Ok(ConversationalRetrievalChain::new(
            self.llm.clone(),
            Arc::new(retriever),
            self.history.clone(),
            self.settings.prompts.clone(),
        )
        .with_verbose(self.settings.verbose))
    }

    pub fn build_plain_chain(&self) -> ConversationChain {
        ConversationChain::new(
            self.llm.clone(),
            self.history.clone(),
            self.settings.prompts.conversation.clone(),
        )
        .with_verbose(self.settings.verbose)
    }
}
