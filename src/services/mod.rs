//! Service layer: the bible cache, templating, deck builds and verse
//! reference parsing.

pub mod bible_service;
pub mod build_service;
pub mod context;
pub mod template_service;
pub mod verse_parser;

pub use bible_service::BibleService;
pub use build_service::BuildService;
pub use context::AppServices;
pub use template_service::TemplateService;
pub use verse_parser::VerseQueryParser;
