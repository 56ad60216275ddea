//! Axum route handler for tarot readings.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::llm_client::generate_with_timeout;
use crate::markdown;
use crate::state::AppState;
use crate::tarot::deck::DrawnCard;
use crate::tarot::reading::{build_reading_prompt, fallback_reading, is_help_request, HELP_MESSAGE};

pub const DEFAULT_NUM_CARDS: i64 = 3;

#[derive(Debug, Deserialize)]
pub struct TarotRequest {
    #[serde(default)]
    pub question: String,
    pub num_cards: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct TarotHelpResponse {
    pub success: bool,
    pub is_help: bool,
    pub message: &'static str,
    pub cards: Vec<DrawnCard>,
}

#[derive(Debug, Serialize)]
pub struct TarotReadingResponse {
    pub success: bool,
    pub question: String,
    pub cards: Vec<DrawnCard>,
    /// Markdown.
    pub reading: String,
    pub reading_html: String,
    pub generated: bool,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum TarotResponse {
    Help(TarotHelpResponse),
    Reading(TarotReadingResponse),
}

/// Number of cards to draw: the request's count (default 3) within
/// `1..=max_cards`.
pub fn cards_to_draw(requested: Option<i64>, max_cards: usize) -> usize {
    let requested = requested.unwrap_or(DEFAULT_NUM_CARDS).max(1);
    let requested = usize::try_from(requested).unwrap_or(usize::MAX);
    requested.min(max_cards.max(1))
}

/// POST /api/tarot
pub async fn handle_tarot(
    State(state): State<AppState>,
    payload: Result<Json<TarotRequest>, JsonRejection>,
) -> Result<Json<TarotResponse>, AppError> {
    let Json(request) = payload?;
    let question = request.question.trim();

    if question.is_empty() {
        return Err(AppError::Validation("질문을 입력해주세요.".to_string()));
    }

    if is_help_request(question) {
        return Ok(Json(TarotResponse::Help(TarotHelpResponse {
            success: true,
            is_help: true,
            message: HELP_MESSAGE,
            cards: Vec::new(),
        })));
    }

    let deck = state.tarot.as_deref().ok_or_else(|| {
        AppError::Unavailable("타로 카드 데이터를 불러오지 못했습니다.".to_string())
    })?;

    let count = cards_to_draw(request.num_cards, state.config.tarot_max_cards);
    let cards = deck.draw(count);
    info!("Tarot reading: {} of {} cards drawn", cards.len(), deck.len());

    let generated = match state.generator.as_deref() {
        Some(generator) => {
            let prompt = build_reading_prompt(question, &cards);
            match generate_with_timeout(generator, &prompt, state.generation).await {
                Ok(text) => Some(text),
                Err(e) => {
                    warn!("Tarot generation failed, using template: {e}");
                    None
                }
            }
        }
        None => None,
    };

    let is_generated = generated.is_some();
    let reading = generated.unwrap_or_else(|| fallback_reading(question, &cards));

    Ok(Json(TarotResponse::Reading(TarotReadingResponse {
        success: true,
        question: question.to_string(),
        reading_html: markdown::to_html(&reading),
        reading,
        cards,
        generated: is_generated,
    })))
}
