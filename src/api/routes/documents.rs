use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use crate::api::routes::error_status;
use crate::api::state::AppState;
use crate::domain::{split_text, Document};

#[derive(Debug, Deserialize)]
pub struct DocumentInput {
    pub content: String,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

/// Either explicit documents, or raw text to be split on paragraphs.
#[derive(Debug, Deserialize)]
pub struct UploadDocumentsRequest {
    #[serde(default)]
    pub documents: Vec<DocumentInput>,
    pub text: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub chunk_size: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct UploadDocumentsResponse {
    pub indexed: usize,
}

impl UploadDocumentsRequest {
    fn into_documents(self, default_chunk_size: usize) -> Vec<Document> {
        let mut documents: Vec<Document> = self
            .documents
            .into_iter()
            .map(|input| {
                let document = Document::new(input.content);
                match input.metadata {
                    Some(metadata) => document.with_metadata(metadata),
                    None => document,
                }
            })
            .collect();

        if let Some(text) = self.text {
            let metadata = self.metadata.unwrap_or(serde_json::Value::Null);
            let chunk_size = self.chunk_size.unwrap_or(default_chunk_size);
            documents.extend(split_text(&text, chunk_size, &metadata));
        }

        documents
    }
}

/// Builds a new grounded chain over the uploaded set, replacing the previous one.
pub async fn upload_documents(
    State(state): State<AppState>,
    Json(request): Json<UploadDocumentsRequest>,
) -> Result<Json<UploadDocumentsResponse>, StatusCode> {
    let documents = request.into_documents(state.config.config.retrieval.chunk_size);
    let indexed = documents.len();

    let chain = state
        .assistant
        .build_grounded_chain(documents)
        .await
        .map_err(|e| error_status(e, "upload documents"))?;

    state.set_grounded_chain(chain).await;
    tracing::info!(indexed, "grounded chain replaced");

    Ok(Json(UploadDocumentsResponse { indexed }))
}
