//! Fetch collaborator port.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{Bible, Book};

/// Supplies fresh records when the cache has none for a key.
///
/// Implementations do not need to stamp the cache key on the returned
/// records; the caller does that before persisting.
#[async_trait]
pub trait BibleFetcher: Send + Sync {
    /// Bibles published by a source.
    async fn fetch_bibles(&self, source_id: i64) -> DomainResult<Vec<Bible>>;

    /// Books of a bible.
    async fn fetch_books(&self, bible_id: i64) -> DomainResult<Vec<Book>>;
}
