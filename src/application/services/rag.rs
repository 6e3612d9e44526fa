use async_trait::async_trait;
use std::sync::Arc;
use tracing::instrument;

use crate::domain::{
    ports::{EmbeddingService, Retriever, VectorStore},
    Document, DomainError, SearchResult,
};

/// Exposes a vector store as a [`Retriever`]: queries are embedded with the
/// same model the documents were indexed with.
pub struct VectorStoreRetriever {
    embedding: Arc<dyn EmbeddingService>,
    vector_store: Arc<dyn VectorStore>,
    top_k: usize,
}

impl VectorStoreRetriever {
    pub fn new(
        embedding: Arc<dyn EmbeddingService>,
        vector_store: Arc<dyn VectorStore>,
        top_k: usize,
    ) -> Self {
        Self {
            embedding,
            vector_store,
            top_k,
        }
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    #[instrument(skip(self, documents), fields(count = documents.len()))]
    pub async fn index_documents(&self, documents: &[Document]) -> Result<(), DomainError> {
        if documents.is_empty() {
            return Err(DomainError::validation("document set must not be empty"));
        }

        let texts: Vec<&str> = documents.iter().map(|d| d.content.as_str()).collect();
        let embeddings = self.embedding.embed_batch(&texts).await?;

        if embeddings.len() != documents.len() {
            return Err(DomainError::external(format!(
                "embedding service returned {} vectors for {} documents",
                embeddings.len(),
                documents.len()
            )));
        }

        self.vector_store.add(documents, &embeddings).await
    }

    #[instrument(skip(self))]
    pub async fn retrieve_top_k(
        &self,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<SearchResult>, DomainError> {
        let embedding = self.embedding.embed(query).await?;
        self.vector_store.search(&embedding, top_k).await
    }
}

#[async_trait]
impl Retriever for VectorStoreRetriever {
    async fn retrieve(&self, query: &str) -> Result<Vec<SearchResult>, DomainError> {
        self.retrieve_top_k(query, self.top_k).await
    }
}
