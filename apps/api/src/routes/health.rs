use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Service version plus whether generation and the tarot deck are available.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let knowledge_loaded = state
        .knowledge
        .status
        .iter()
        .filter(|s| s.error.is_none())
        .count();

    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "advisor-api",
        "demo_mode": state.generator.is_none(),
        "model": state.generator.as_ref().map(|_| state.config.gemini_model.as_str()),
        "knowledge_categories_loaded": knowledge_loaded,
        "tarot_deck_loaded": state.tarot.is_some(),
    }))
}
