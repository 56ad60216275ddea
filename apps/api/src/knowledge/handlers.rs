//! Read-only operator views of the loaded knowledge snapshot.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use serde_json::Value;

use crate::errors::AppError;
use crate::knowledge::{Category, CategoryStatus};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct KnowledgeSummaryResponse {
    pub success: bool,
    pub categories: Vec<CategoryStatus>,
}

#[derive(Debug, Serialize)]
pub struct CategoryRecordsResponse {
    pub success: bool,
    pub category: Category,
    pub records: Vec<Value>,
}

/// GET /api/knowledge
pub async fn handle_knowledge_summary(State(state): State<AppState>) -> Json<KnowledgeSummaryResponse> {
    Json(KnowledgeSummaryResponse {
        success: true,
        categories: state.knowledge.status.clone(),
    })
}

/// GET /api/knowledge/:category
pub async fn handle_category_records(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<CategoryRecordsResponse>, AppError> {
    let category = Category::from_slug(&slug)
        .ok_or_else(|| AppError::NotFound(format!("Unknown knowledge category '{slug}'")))?;

    let records = state
        .knowledge
        .records_json(category)
        .map_err(|e| AppError::Internal(e.into()))?;

    Ok(Json(CategoryRecordsResponse {
        success: true,
        category,
        records,
    }))
}
