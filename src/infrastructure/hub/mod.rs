//! Hugging Face Inference API plumbing shared by the model and embedding adapters.

mod client;
mod credential;

pub use client::{HubClient, RequestOptions};
pub use credential::HubCredential;
