//! Application layer - Use cases and orchestration.
//!
//! Chains and the retriever depend on domain ports (traits) rather than
//! concrete implementations, so every backend can be swapped for a fake.

pub mod chains;
pub mod services;

pub use chains::{
    Chain, ChainPrompts, ChainResponse, ConversationChain, ConversationalRetrievalChain,
};
pub use services::VectorStoreRetriever;
