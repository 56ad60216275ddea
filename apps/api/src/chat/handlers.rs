//! Axum route handlers for the general chat API.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use crate::errors::AppError;
use crate::markdown;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    /// HTML rendered from the model's Markdown.
    pub reply: String,
}

/// POST /api/chat
pub async fn handle_chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    let Json(request) = payload?;
    let message = request
        .message
        .filter(|m| !m.trim().is_empty())
        .ok_or_else(|| AppError::Validation("메시지가 없습니다.".to_string()))?;

    let generator = state.generator.as_deref().ok_or_else(|| {
        AppError::Unavailable(
            "모델이 초기화되지 않았습니다. API 키와 설정을 확인하세요.".to_string(),
        )
    })?;

    let reply = state
        .chat
        .send(generator, state.generation, &message)
        .await
        .map_err(|e| AppError::Llm(e.to_string()))?;

    Ok(Json(ChatResponse {
        reply: markdown::to_html(&reply),
    }))
}

/// POST /api/chat/reset
pub async fn handle_chat_reset(State(state): State<AppState>) -> Json<Value> {
    let cleared = state.chat.reset().await;
    info!("Chat history cleared ({cleared} exchanges)");
    Json(json!({ "success": true }))
}
