//! Bible2PPT - scripture slide deck builder
//!
//! Fetches bible and book records through a read-through SQLite cache,
//! renders text templates and writes presentation decks, keeping a history
//! of every build. Exposed as a CLI and as an HTTP API.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): models, errors and port traits
//! - **Service Layer** (`services`): the bible cache, templating, deck builds
//!   and verse parsing
//! - **Adapters** (`adapters`): SQLite storage, bible fetchers, deck writers
//!   and the HTTP API
//! - **Infrastructure Layer** (`infrastructure`): configuration, logging and
//!   project setup
//! - **CLI Layer** (`cli`): command-line interface
//!
//! # Example
//!
//! ```ignore
//! use bible2ppt::{AppServices, ConfigLoader};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ConfigLoader::load()?;
//!     let services = AppServices::from_config(&config).await?;
//!     let bibles = services.bibles.get_bibles(1).await?;
//!     println!("{} bibles", bibles.len());
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{DomainError, DomainResult};
pub use domain::models::{
    Bible, Book, BuildRecord, BuildRequest, BuildResult, Config, Deck, ParsedVerseQuery, Slide, Template,
};
pub use domain::ports::{BibleFetcher, BibleRepository, BuildHistoryRepository, DeckWriter, TemplateRepository};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{AppServices, BibleService, BuildService, TemplateService, VerseQueryParser};
