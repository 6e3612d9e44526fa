use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use crate::api::routes::error_status;
use crate::api::state::AppState;
use crate::application::Chain;
use crate::domain::Message;

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub question: String,
}

#[derive(Debug, Serialize)]
pub struct SourceResponse {
    pub content: String,
    pub metadata: serde_json::Value,
    pub score: f32,
}

#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub answer: String,
    pub generated_question: String,
    pub sources: Vec<SourceResponse>,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub messages: Vec<Message>,
}

pub async fn ask_handler(
    State(state): State<AppState>,
    Json(request): Json<AskRequest>,
) -> Result<Json<AskResponse>, StatusCode> {
    let chain = state.grounded_chain().await.ok_or_else(|| {
        tracing::warn!("ask received before any documents were uploaded");
        StatusCode::CONFLICT
    })?;

    let _guard = state.answer_lock.lock().await;
    let response = chain
        .answer_with_sources(&request.question)
        .await
        .map_err(|e| error_status(e, "ask"))?;

    Ok(Json(AskResponse {
        answer: response.answer,
        generated_question: response.generated_question,
        sources: response
            .source_documents
            .into_iter()
            .map(|r| SourceResponse {
                content: r.document.content,
                metadata: r.document.metadata,
                score: r.score,
            })
            .collect(),
    }))
}

pub async fn chat_handler(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, StatusCode> {
    let _guard = state.answer_lock.lock().await;
    let response = state
        .plain_chain
        .answer(&request.message)
        .await
        .map_err(|e| error_status(e, "chat"))?;

    Ok(Json(ChatResponse { response }))
}

pub async fn get_history(
    State(state): State<AppState>,
) -> Result<Json<HistoryResponse>, StatusCode> {
    let messages = state
        .assistant
        .history()
        .messages()
        .await
        .map_err(|e| error_status(e, "history"))?;

    Ok(Json(HistoryResponse { messages }))
}

pub async fn clear_history(State(state): State<AppState>) -> Result<StatusCode, StatusCode> {
    let _guard = state.answer_lock.lock().await;
    state
        .assistant
        .history()
        .clear()
        .await
        .map_err(|e| error_status(e, "clear history"))?;

    Ok(StatusCode::NO_CONTENT)
}
