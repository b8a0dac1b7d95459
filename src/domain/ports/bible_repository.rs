//! Bible cache storage port.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{Bible, Book};

/// Repository interface for cached bibles and books.
///
/// Records are insert-only. The only removal is [`clear`](Self::clear),
/// which drops everything.
#[async_trait]
pub trait BibleRepository: Send + Sync {
    /// All bibles cached under a source id, in insertion order.
    async fn list_by_source(&self, source_id: i64) -> DomainResult<Vec<Bible>>;

    /// First cached bible with the given id.
    async fn find(&self, id: i64) -> DomainResult<Option<Bible>>;

    /// Persist a batch of bibles atomically.
    async fn insert_bibles(&self, bibles: &[Bible]) -> DomainResult<()>;

    /// All books cached under a bible id, in canonical order.
    async fn list_books(&self, bible_id: i64) -> DomainResult<Vec<Book>>;

    /// Persist a batch of books atomically.
    async fn insert_books(&self, books: &[Book]) -> DomainResult<()>;

    /// Delete every cached bible and book.
    async fn clear(&self) -> DomainResult<()>;
}
