mod embedding;
mod history;
mod llm;
mod retriever;
mod vector_store;

pub use embedding::EmbeddingService;
pub use history::ChatHistory;
pub use llm::LlmService;
pub use retriever::Retriever;
pub use vector_store::VectorStore;
