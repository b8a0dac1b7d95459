//! Deck output port.

use crate::domain::errors::DomainResult;
use crate::domain::models::Deck;

/// Serializes a deck into the bytes of a presentation file.
///
/// Writers only encode; choosing and creating the target file is left
/// to the caller.
pub trait DeckWriter: Send + Sync {
    /// File extension without the leading dot, e.g. `pptx`.
    fn extension(&self) -> &'static str;

    fn encode(&self, deck: &Deck) -> DomainResult<Vec<u8>>;
}
