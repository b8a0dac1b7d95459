//! Read-through cache behavior against a real SQLite store.

mod common;

use std::sync::Arc;

use bible2ppt::adapters::sqlite::SqliteBibleRepository;
use bible2ppt::domain::models::{Bible, Book};
use bible2ppt::{BibleRepository, BibleService};

use common::{bible_row_count, shared, test_pool, CountingFetcher};

fn service(pool: &sqlx::SqlitePool, fetcher: Arc<CountingFetcher>) -> BibleService {
    BibleService::new(Arc::new(SqliteBibleRepository::new(pool.clone())), fetcher)
}

#[tokio::test]
async fn test_miss_fetches_stamps_and_persists() {
    let pool = test_pool().await;
    let fetcher = shared(CountingFetcher::with_bibles(vec![
        Bible::new(1, "King James Version", "en"),
        Bible::new(2, "Revised Version", "ko"),
    ]));
    let bibles = service(&pool, fetcher.clone());

    let result = bibles.get_bibles(7).await.unwrap();

    assert_eq!(result.iter().map(|b| b.id).collect::<Vec<_>>(), vec![1, 2]);
    assert!(result.iter().all(|b| b.source_id == 7));
    assert_eq!(fetcher.calls(), 1);

    let stored = SqliteBibleRepository::new(pool.clone()).list_by_source(7).await.unwrap();
    assert_eq!(stored, result);
    assert_eq!(bible_row_count(&pool).await, 2);
}

#[tokio::test]
async fn test_hit_returns_stored_records_without_fetching() {
    let pool = test_pool().await;
    let repo = SqliteBibleRepository::new(pool.clone());
    repo.insert_bibles(&[Bible::new(5, "Stored", "en").with_source(7)]).await.unwrap();

    let fetcher = shared(CountingFetcher::with_bibles(vec![Bible::new(1, "Fresh", "en")]));
    let result = service(&pool, fetcher.clone()).get_bibles(7).await.unwrap();

    assert_eq!(result, vec![Bible::new(5, "Stored", "en").with_source(7)]);
    assert_eq!(fetcher.calls(), 0);
}

#[tokio::test]
async fn test_keys_are_independent() {
    let pool = test_pool().await;
    let fetcher = shared(CountingFetcher::with_bibles(vec![Bible::new(1, "KJV", "en")]));
    let bibles = service(&pool, fetcher.clone());

    bibles.get_bibles(1).await.unwrap();
    bibles.get_bibles(2).await.unwrap();
    bibles.get_bibles(1).await.unwrap();

    assert_eq!(fetcher.calls(), 2);
    assert_eq!(bible_row_count(&pool).await, 2);
}

#[tokio::test]
async fn test_clear_forces_refetch() {
    let pool = test_pool().await;
    let fetcher = shared(CountingFetcher::with_bibles(vec![Bible::new(1, "KJV", "en")]));
    let bibles = service(&pool, fetcher.clone());

    bibles.get_bibles(3).await.unwrap();
    bibles.clear().await.unwrap();
    assert_eq!(bible_row_count(&pool).await, 0);

    let again = bibles.get_bibles(3).await.unwrap();
    assert_eq!(again.len(), 1);
    assert_eq!(fetcher.calls(), 2);
}

#[tokio::test]
async fn test_clear_on_empty_store_succeeds() {
    let pool = test_pool().await;
    let bibles = service(&pool, shared(CountingFetcher::default()));
    bibles.clear().await.unwrap();
    bibles.clear().await.unwrap();
}

#[tokio::test]
async fn test_empty_fetch_is_not_cached() {
    let pool = test_pool().await;
    let fetcher = shared(CountingFetcher::default());
    let bibles = service(&pool, fetcher.clone());

    assert!(bibles.get_bibles(9).await.unwrap().is_empty());
    assert!(bibles.get_bibles(9).await.unwrap().is_empty());
    assert_eq!(fetcher.calls(), 2);
}

#[tokio::test]
async fn test_fetch_failure_propagates_and_persists_nothing() {
    let pool = test_pool().await;
    let bibles = service(&pool, shared(CountingFetcher::failing()));

    let err = bibles.get_bibles(7).await.unwrap_err();
    assert!(err.to_string().contains("source unavailable"));
    assert_eq!(bible_row_count(&pool).await, 0);
}

#[tokio::test]
async fn test_books_follow_the_same_pattern() {
    let pool = test_pool().await;
    let fetcher = shared(CountingFetcher::with_books(vec![
        Book::new(1, "Genesis", "Gen").with_chapters(50),
        Book::new(2, "Exodus", "Ex").with_chapters(40),
    ]));
    let bibles = service(&pool, fetcher.clone());

    let first = bibles.get_books(11).await.unwrap();
    let second = bibles.get_books(11).await.unwrap();

    assert_eq!(first, second);
    assert!(first.iter().all(|b| b.bible_id == 11));
    assert_eq!(fetcher.calls(), 1);

    bibles.clear().await.unwrap();
    bibles.get_books(11).await.unwrap();
    assert_eq!(fetcher.calls(), 2);
}

#[tokio::test]
async fn test_find_bible_reads_cache_only() {
    let pool = test_pool().await;
    let fetcher = shared(CountingFetcher::with_bibles(vec![Bible::new(4, "KJV", "en")]));
    let bibles = service(&pool, fetcher.clone());

    assert!(bibles.find_bible(4).await.unwrap().is_none());
    assert_eq!(fetcher.calls(), 0);

    bibles.get_bibles(1).await.unwrap();
    let found = bibles.find_bible(4).await.unwrap().unwrap();
    assert_eq!(found.source_id, 1);
}

#[tokio::test]
async fn test_sequential_misses_without_single_flight_store_once_each() {
    // Sequential calls never race: the second one sees the first one's rows.
    let pool = test_pool().await;
    let fetcher = shared(CountingFetcher::with_bibles(vec![Bible::new(1, "KJV", "en")]));
    let bibles = service(&pool, fetcher.clone()).with_single_flight(false);

    bibles.get_bibles(7).await.unwrap();
    bibles.get_bibles(7).await.unwrap();

    assert_eq!(fetcher.calls(), 1);
    assert_eq!(bible_row_count(&pool).await, 1);
}
