mod conversation;
mod document;
mod embedding;

pub use conversation::{transcript, Conversation, Message, MessageRole};
pub use document::{split_text, Document, SearchResult};
pub use embedding::Embedding;
