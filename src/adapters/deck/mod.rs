//! Deck writers producing presentation files.

pub mod json_writer;
pub mod odp_writer;
pub mod pptx_writer;
mod xml;

pub use json_writer::JsonDeckWriter;
pub use odp_writer::FlatOdpWriter;
pub use pptx_writer::PptxWriter;

use std::sync::Arc;

use crate::domain::models::DeckFormat;
use crate::domain::ports::DeckWriter;

/// Writer for the configured output format.
pub fn writer_for(format: DeckFormat) -> Arc<dyn DeckWriter> {
    match format {
        DeckFormat::Pptx => Arc::new(PptxWriter::new()),
        DeckFormat::Odp => Arc::new(FlatOdpWriter::new()),
        DeckFormat::Json => Arc::new(JsonDeckWriter::new()),
    }
}
