mod rag;

pub use rag::VectorStoreRetriever;
