//! Conversational question answering over a hosted model, with an optional
//! in-memory similarity index for grounding answers in caller documents.

pub mod api;
pub mod application;
pub mod domain;
pub mod infrastructure;

#[cfg(test)]
pub(crate) mod testing;
