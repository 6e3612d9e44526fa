mod huggingface;

pub use huggingface::{GenerationParameters, HubLlm};
