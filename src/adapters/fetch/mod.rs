//! Fetch collaborators consulted on a cache miss.

pub mod http_fetcher;
pub mod static_fetcher;

pub use http_fetcher::HttpBibleFetcher;
pub use static_fetcher::StaticBibleFetcher;

use std::sync::Arc;
use std::time::Duration;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{SourceConfig, SourceKind};
use crate::domain::ports::BibleFetcher;

/// Build the fetcher selected by configuration.
pub fn fetcher_from_config(config: &SourceConfig) -> DomainResult<Arc<dyn BibleFetcher>> {
    match config.kind {
        SourceKind::Static => Ok(Arc::new(StaticBibleFetcher::new())),
        SourceKind::Http => {
            let base_url = config.base_url.as_deref().ok_or_else(|| {
                DomainError::ValidationFailed("source.base_url is required for http sources".to_string())
            })?;
            let fetcher = HttpBibleFetcher::new(base_url, Duration::from_secs(config.timeout_secs))?;
            Ok(Arc::new(fetcher))
        }
    }
}
