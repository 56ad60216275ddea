use std::sync::Arc;
use std::time::Duration;

use crate::chat::ChatSession;
use crate::config::Config;
use crate::knowledge::KnowledgeBase;
use crate::llm_client::{GenerationSettings, TextGenerator};
use crate::tarot::TarotDeck;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Read-only after startup.
    pub knowledge: Arc<KnowledgeBase>,
    /// `None` in demo mode: loan and tarot answer from templates, chat is unavailable.
    pub generator: Option<Arc<dyn TextGenerator>>,
    pub generation: GenerationSettings,
    pub chat: Arc<ChatSession>,
    /// `None` when the deck file could not be loaded.
    pub tarot: Option<Arc<TarotDeck>>,
}

impl AppState {
    pub fn new(
        config: Config,
        knowledge: KnowledgeBase,
        generator: Option<Arc<dyn TextGenerator>>,
        tarot: Option<TarotDeck>,
    ) -> Self {
        let generation = GenerationSettings {
            temperature: config.temperature,
            timeout: Duration::from_secs(config.llm_timeout_secs),
        };
        let chat = Arc::new(ChatSession::new(config.chat_max_history));

        Self {
            config,
            knowledge: Arc::new(knowledge),
            generator,
            generation,
            chat,
            tarot: tarot.map(Arc::new),
        }
    }
}
