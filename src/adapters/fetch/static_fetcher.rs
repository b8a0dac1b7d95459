//! Fetcher that serves built-in records without any network access.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{Bible, Book};
use crate::domain::ports::BibleFetcher;

/// (name, abbreviation, chapters) for the books the static source knows.
const BOOKS: &[(&str, &str, i64)] = &[
    ("Genesis", "Gen", 50),
    ("Exodus", "Ex", 40),
    ("Psalms", "Ps", 150),
    ("Matthew", "Mt", 28),
    ("John", "Jn", 21),
    ("1 John", "1Jn", 5),
    ("Revelation", "Rev", 22),
];

/// Serves two bibles for every source and a fixed list of books for
/// every bible.
#[derive(Debug, Clone, Default)]
pub struct StaticBibleFetcher;

impl StaticBibleFetcher {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl BibleFetcher for StaticBibleFetcher {
    async fn fetch_bibles(&self, source_id: i64) -> DomainResult<Vec<Bible>> {
        tracing::debug!(source_id, "serving static bibles");
        Ok(vec![
            Bible::new(1, "King James Version", "en"),
            Bible::new(2, "Revised Version", "ko"),
        ])
    }

    async fn fetch_books(&self, bible_id: i64) -> DomainResult<Vec<Book>> {
        tracing::debug!(bible_id, "serving static books");
        Ok(BOOKS
            .iter()
            .zip(1_i64..)
            .map(|(&(name, abbreviation, chapters), id)| Book::new(id, name, abbreviation).with_chapters(chapters))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_bibles_are_unstamped() {
        let bibles = StaticBibleFetcher::new().fetch_bibles(7).await.unwrap();
        let ids: Vec<_> = bibles.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert!(bibles.iter().all(|b| b.source_id == 0));
    }

    #[tokio::test]
    async fn test_static_books_have_positions() {
        let books = StaticBibleFetcher::new().fetch_books(1).await.unwrap();
        assert_eq!(books.len(), BOOKS.len());
        assert_eq!(books[0].name, "Genesis");
        assert_eq!(books[0].position, 1);
        assert_eq!(books[4].abbreviation, "Jn");
    }
}
