//! Pretty-printed JSON deck output.

use crate::domain::errors::DomainResult;
use crate::domain::models::Deck;
use crate::domain::ports::DeckWriter;

#[derive(Debug, Clone, Default)]
pub struct JsonDeckWriter;

impl JsonDeckWriter {
    pub fn new() -> Self {
        Self
    }
}

impl DeckWriter for JsonDeckWriter {
    fn extension(&self) -> &'static str {
        "deck.json"
    }

    fn encode(&self, deck: &Deck) -> DomainResult<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(deck)?)
    }
}
