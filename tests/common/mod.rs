//! Shared fixtures for integration tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use bible2ppt::adapters::sqlite::create_migrated_test_pool;
use bible2ppt::domain::models::{Bible, Book};
use bible2ppt::{BibleFetcher, DomainError, DomainResult};
use sqlx::SqlitePool;

/// Fetcher returning a fixed set of records and counting calls.
#[derive(Default)]
pub struct CountingFetcher {
    pub bibles: Vec<Bible>,
    pub books: Vec<Book>,
    pub fail: bool,
    calls: AtomicUsize,
}

#[allow(dead_code)]
impl CountingFetcher {
    pub fn with_bibles(bibles: Vec<Bible>) -> Self {
        Self {
            bibles,
            ..Self::default()
        }
    }

    pub fn with_books(books: Vec<Book>) -> Self {
        Self {
            books,
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BibleFetcher for CountingFetcher {
    async fn fetch_bibles(&self, _source_id: i64) -> DomainResult<Vec<Bible>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(DomainError::FetchFailed("source unavailable".to_string()));
        }
        Ok(self.bibles.clone())
    }

    async fn fetch_books(&self, _bible_id: i64) -> DomainResult<Vec<Book>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(DomainError::FetchFailed("source unavailable".to_string()));
        }
        Ok(self.books.clone())
    }
}

/// In-memory database with the schema applied.
pub async fn test_pool() -> SqlitePool {
    create_migrated_test_pool().await.expect("failed to create test pool")
}

/// Number of rows in `bibles`.
#[allow(dead_code)]
pub async fn bible_row_count(pool: &SqlitePool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM bibles")
        .fetch_one(pool)
        .await
        .expect("failed to count bibles")
}

#[allow(dead_code)]
pub fn shared(fetcher: CountingFetcher) -> Arc<CountingFetcher> {
    Arc::new(fetcher)
}
