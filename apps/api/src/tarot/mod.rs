//! Tarot readings over the major arcana.

pub mod deck;
pub mod handlers;
pub mod reading;

pub use deck::TarotDeck;
