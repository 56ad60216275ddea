use std::collections::VecDeque;

use tokio::sync::Mutex;
use tracing::debug;

use crate::llm_client::{converse_with_timeout, GenerationSettings, LlmError, TextGenerator, Turn};

/// One user message and the model's reply to it.
#[derive(Debug, Clone, PartialEq)]
struct Exchange {
    user: String,
    model: String,
}

/// The single server-wide conversation.
///
/// The lock is held for the whole generation call so concurrent messages are
/// answered in order, each seeing the previous reply. Only successful
/// exchanges are recorded; at most `max_history` are kept, oldest dropped.
#[derive(Debug)]
pub struct ChatSession {
    history: Mutex<VecDeque<Exchange>>,
    max_history: usize,
}

impl ChatSession {
    pub fn new(max_history: usize) -> Self {
        Self {
            history: Mutex::new(VecDeque::with_capacity(max_history)),
            max_history,
        }
    }

    /// Sends `message` with the recorded history and returns the raw Markdown reply.
    pub async fn send(
        &self,
        generator: &dyn TextGenerator,
        settings: GenerationSettings,
        message: &str,
    ) -> Result<String, LlmError> {
        let mut history = self.history.lock().await;

        let mut turns: Vec<Turn> = Vec::with_capacity(history.len() * 2 + 1);
        for exchange in history.iter() {
            turns.push(Turn::user(exchange.user.as_str()));
            turns.push(Turn::model(exchange.model.as_str()));
        }
        turns.push(Turn::user(message));

        let reply = converse_with_timeout(generator, &turns, settings).await?;

        if self.max_history > 0 {
            if history.len() == self.max_history {
                history.pop_front();
            }
            history.push_back(Exchange {
                user: message.to_string(),
                model: reply.clone(),
            });
        }
        debug!("Chat history holds {} exchanges", history.len());

        Ok(reply)
    }

    /// Forgets every recorded exchange and returns how many there were.
    pub async fn reset(&self) -> usize {
        let mut history = self.history.lock().await;
        let cleared = history.len();
        history.clear();
        cleared
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.history.lock().await.len()
    }
}
