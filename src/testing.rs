//! Scripted port implementations shared by unit tests.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::domain::{
    ports::{EmbeddingService, LlmService, Retriever},
    Document, DomainError, Embedding, SearchResult,
};

/// Records every prompt and answers from a queue of replies, then "ok".
#[derive(Default)]
pub struct FakeLlm {
    replies: Mutex<VecDeque<String>>,
    prompts: Mutex<Vec<String>>,
    failure: Option<String>,
}

impl FakeLlm {
    pub fn with_replies<const N: usize>(replies: [&str; N]) -> Self {
        Self {
            replies: Mutex::new(replies.iter().map(|r| r.to_string()).collect()),
            ..Self::default()
        }
    }

    pub fn then_reply(self, reply: &str) -> Self {
        self.replies.lock().unwrap().push_back(reply.to_string());
        self
    }

    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmService for FakeLlm {
    async fn generate(&self, prompt: &str) -> Result<String, DomainError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if let Some(message) = &self.failure {
            return Err(DomainError::external(message.clone()));
        }
        Ok(self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| "ok".to_string()))
    }

    fn model_name(&self) -> &str {
        "fake-llm"
    }
}

/// Bag-of-words embedding over a fixed vocabulary.
pub struct FakeEmbedding {
    vocabulary: Vec<String>,
    batch_sizes: Mutex<Vec<usize>>,
    truncate: bool,
}

impl FakeEmbedding {
    pub fn new(vocabulary: &[&str]) -> Self {
        Self {
            vocabulary: vocabulary.iter().map(|w| w.to_lowercase()).collect(),
            batch_sizes: Mutex::new(Vec::new()),
            truncate: false,
        }
    }

    /// Makes batch calls drop their last vector.
    pub fn truncating_batches(mut self) -> Self {
        self.truncate = true;
        self
    }

    pub fn batch_sizes(&self) -> Vec<usize> {
        self.batch_sizes.lock().unwrap().clone()
    }

    fn vectorize(&self, text: &str) -> Embedding {
        let lower = text.to_lowercase();
        let words: Vec<&str> = lower
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();

        self.vocabulary
            .iter()
            .map(|term| words.iter().filter(|w| **w == term.as_str()).count() as f32)
            .collect::<Vec<_>>()
            .into()
    }
}

#[async_trait]
impl EmbeddingService for FakeEmbedding {
    async fn embed(&self, text: &str) -> Result<Embedding, DomainError> {
        Ok(self.vectorize(text))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, DomainError> {
        self.batch_sizes.lock().unwrap().push(texts.len());
        let mut embeddings: Vec<Embedding> = texts.iter().map(|t| self.vectorize(t)).collect();
        if self.truncate {
            embeddings.pop();
        }
        Ok(embeddings)
    }

    fn model_name(&self) -> &str {
        "fake-embedding"
    }
}

/// Returns a fixed document list and records the queries it was asked.
pub struct FakeRetriever {
    documents: Vec<Document>,
    queries: Mutex<Vec<String>>,
    failure: Option<String>,
}

impl FakeRetriever {
    pub fn new(documents: Vec<Document>) -> Self {
        Self {
            documents,
            queries: Mutex::new(Vec::new()),
            failure: None,
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::new(Vec::new())
        }
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl Retriever for FakeRetriever {
    async fn retrieve(&self, query: &str) -> Result<Vec<SearchResult>, DomainError> {
        self.queries.lock().unwrap().push(query.to_string());
        if let Some(message) = &self.failure {
            return Err(DomainError::external(message.clone()));
        }
        Ok(self
            .documents
            .iter()
            .cloned()
            .map(|document| SearchResult {
                document,
                score: 1.0,
            })
            .collect())
    }
}
