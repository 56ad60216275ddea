use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum DeckError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed deck in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{0} contains no cards")]
    Empty(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TarotCard {
    pub name: String,
    pub name_korean: String,
    pub description: String,
    pub upright_meaning: String,
    pub reversed_meaning: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_image: Option<String>,
}

/// A card as it came out of the deck for one reading.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrawnCard {
    #[serde(flatten)]
    pub card: TarotCard,
    pub is_reversed: bool,
}

impl DrawnCard {
    pub fn orientation(&self) -> &'static str {
        if self.is_reversed {
            "역방향"
        } else {
            "정방향"
        }
    }

    /// Meaning for the orientation the card was drawn in.
    pub fn meaning(&self) -> &str {
        if self.is_reversed {
            &self.card.reversed_meaning
        } else {
            &self.card.upright_meaning
        }
    }
}

#[derive(Debug, Deserialize)]
struct DeckFile {
    major_arcana: Vec<TarotCard>,
}

/// The major arcana, loaded once at startup.
#[derive(Debug, Clone)]
pub struct TarotDeck {
    cards: Vec<TarotCard>,
}

impl TarotDeck {
    pub fn new(cards: Vec<TarotCard>) -> Self {
        Self { cards }
    }

    pub fn load(path: &Path) -> Result<Self, DeckError> {
        let raw = std::fs::read_to_string(path).map_err(|source| DeckError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file: DeckFile = serde_json::from_str(&raw).map_err(|source| DeckError::Json {
            path: path.to_path_buf(),
            source,
        })?;

        let deck = Self::new(file.major_arcana);
        if deck.is_empty() {
            return Err(DeckError::Empty(path.to_path_buf()));
        }

        info!("Loaded {} tarot cards from {}", deck.len(), path.display());
        Ok(deck)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Draws `count` distinct cards, each independently upright or reversed.
    pub fn draw(&self, count: usize) -> Vec<DrawnCard> {
        self.draw_with(count, || Uuid::new_v4().as_u64_pair().1)
    }

    /// Partial Fisher-Yates over the deck using `next` as the entropy source.
    /// `count` is capped at the deck size.
    pub fn draw_with<F>(&self, count: usize, mut next: F) -> Vec<DrawnCard>
    where
        F: FnMut() -> u64,
    {
        let count = count.min(self.cards.len());
        let mut order: Vec<usize> = (0..self.cards.len()).collect();

        (0..count)
            .map(|i| {
                let remaining = (order.len() - i) as u64;
                let j = i + (next() % remaining) as usize;
                order.swap(i, j);
                DrawnCard {
                    card: self.cards[order[i]].clone(),
                    is_reversed: next() & 1 == 1,
                }
            })
            .collect()
    }
}
