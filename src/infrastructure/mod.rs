pub mod assistant;
pub mod config;
pub mod embedding;
pub mod history;
pub mod hub;
pub mod llm;
pub mod vector_store;

pub use assistant::{Assistant, ChainSettings};
pub use config::{AppConfig, Config};
pub use embedding::HubEmbedding;
pub use history::InMemoryChatHistory;
pub use hub::{HubClient, HubCredential};
pub use llm::HubLlm;
pub use vector_store::InMemoryVectorStore;
