mod huggingface;

pub use huggingface::HubEmbedding;
