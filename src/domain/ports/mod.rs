//! Port trait definitions (Hexagonal Architecture)
//!
//! Interfaces that adapters implement:
//! - BibleRepository: cached bible and book storage
//! - BibleFetcher: fetch collaborator consulted on a cache miss
//! - TemplateRepository: template storage
//! - DeckWriter: presentation file output
//! - BuildHistoryRepository: build attempt records

pub mod bible_fetcher;
pub mod bible_repository;
pub mod build_history_repository;
pub mod deck_writer;
pub mod template_repository;

pub use bible_fetcher::BibleFetcher;
pub use bible_repository::BibleRepository;
pub use build_history_repository::BuildHistoryRepository;
pub use deck_writer::DeckWriter;
pub use template_repository::TemplateRepository;
