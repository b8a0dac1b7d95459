pub mod bible;
pub mod config;
pub mod deck;
pub mod history;
pub mod template;
pub mod verse;

pub use bible::{Bible, Book};
pub use config::{
    CacheConfig, Config, DatabaseConfig, DeckFormat, LoggingConfig, OutputConfig, RotationPolicy,
    ServerConfig, SourceConfig, SourceKind,
};
pub use deck::{BuildOptions, BuildRequest, BuildResult, BuildStatus, Deck, Slide, DEFAULT_TITLE};
pub use history::{BuildRecord, NewBuildRecord};
pub use template::{NewTemplate, Template};
pub use verse::{ParsedVerseQuery, WHOLE_CHAPTER};
