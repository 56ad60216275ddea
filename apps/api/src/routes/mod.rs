pub mod health;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::services::ServeDir;

use crate::chat::handlers as chat;
use crate::knowledge::handlers as knowledge;
use crate::loan::handlers as loan;
use crate::state::AppState;
use crate::tarot::handlers as tarot;

pub fn build_router(state: AppState) -> Router {
    let card_images = ServeDir::new(&state.config.tarot_image_dir);

    Router::new()
        .route("/health", get(health::health_handler))
        // Loan pre-screening
        .route("/api/loan-check", post(loan::handle_loan_check))
        // Chat
        .route("/api/chat", post(chat::handle_chat))
        .route("/api/chat/reset", post(chat::handle_chat_reset))
        // Tarot
        .route("/api/tarot", post(tarot::handle_tarot))
        .nest_service("/card_image", card_images)
        // Knowledge snapshot
        .route("/api/knowledge", get(knowledge::handle_knowledge_summary))
        .route(
            "/api/knowledge/:category",
            get(knowledge::handle_category_records),
        )
        .with_state(state)
}
