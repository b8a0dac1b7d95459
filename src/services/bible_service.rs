//! Read-through cache of bibles and books.
//!
//! Every lookup follows the same linear sequence: check the store, and
//! only when it holds nothing for the key, fetch from the collaborator,
//! stamp the key on each record, persist, and return. Cached records are
//! returned as stored; there is no TTL or freshness check.
//!
//! Failures from the store or the fetcher propagate unchanged. Nothing is
//! retried, and records that failed to persist are not returned.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::{debug, info, instrument};

use crate::domain::errors::DomainResult;
use crate::domain::models::{Bible, Book};
use crate::domain::ports::{BibleFetcher, BibleRepository};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum CacheKey {
    Source(i64),
    Bible(i64),
}

type LockTable = Mutex<HashMap<CacheKey, Arc<AsyncMutex<()>>>>;

/// Per-key async locks serializing check-fetch-persist sequences.
///
/// An entry lives only while some task holds or waits on it; the last
/// [`KeyGuard`] to go away removes it from the table.
#[derive(Default)]
struct KeyLocks {
    locks: Arc<LockTable>,
}

impl KeyLocks {
    async fn acquire(&self, key: CacheKey) -> KeyGuard {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(locks.entry(key).or_default())
        };
        // Declared before `pending` so a cancelled waiter drops the
        // pending lock first and the guard can still clean up.
        let mut guard = KeyGuard {
            key,
            table: Arc::clone(&self.locks),
            lock: Some(Arc::clone(&lock)),
            held: None,
        };
        let pending = lock.lock_owned();
        guard.held = Some(pending.await);
        guard
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

/// Holds a key's lock and drops the table entry once nobody else uses it.
struct KeyGuard {
    key: CacheKey,
    table: Arc<LockTable>,
    lock: Option<Arc<AsyncMutex<()>>>,
    held: Option<OwnedMutexGuard<()>>,
}

impl Drop for KeyGuard {
    fn drop(&mut self) {
        let mut locks = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        self.held.take();
        self.lock.take();
        // Only the table's own reference left.
        if locks.get(&self.key).is_some_and(|lock| Arc::strong_count(lock) == 1) {
            locks.remove(&self.key);
        }
    }
}

/// Read-through cache over a [`BibleRepository`], filled from a
/// [`BibleFetcher`] on a miss.
///
/// With single-flight enabled (the default), concurrent misses for the
/// same key inside this process wait for one fetch instead of each
/// fetching and persisting their own copy. With it disabled, concurrent
/// misses race and may store duplicate records.
pub struct BibleService {
    repo: Arc<dyn BibleRepository>,
    fetcher: Arc<dyn BibleFetcher>,
    key_locks: Option<KeyLocks>,
}

impl BibleService {
    pub fn new(repo: Arc<dyn BibleRepository>, fetcher: Arc<dyn BibleFetcher>) -> Self {
        Self {
            repo,
            fetcher,
            key_locks: Some(KeyLocks::default()),
        }
    }

    /// Enable or disable per-key serialization of cache misses.
    pub fn with_single_flight(mut self, enabled: bool) -> Self {
        self.key_locks = enabled.then(KeyLocks::default);
        self
    }

    async fn lock_key(&self, key: CacheKey) -> Option<KeyGuard> {
        match &self.key_locks {
            Some(locks) => Some(locks.acquire(key).await),
            None => None,
        }
    }

    /// Bibles for a source, fetched and cached on a miss.
    #[instrument(skip(self), err)]
    pub async fn get_bibles(&self, source_id: i64) -> DomainResult<Vec<Bible>> {
        let _guard = self.lock_key(CacheKey::Source(source_id)).await;

        let cached = self.repo.list_by_source(source_id).await?;
        if !cached.is_empty() {
            debug!(count = cached.len(), "bible cache hit");
            return Ok(cached);
        }

        let bibles: Vec<Bible> = self
            .fetcher
            .fetch_bibles(source_id)
            .await?
            .into_iter()
            .map(|bible| bible.with_source(source_id))
            .collect();

        self.repo.insert_bibles(&bibles).await?;
        info!(count = bibles.len(), "cached fetched bibles");
        Ok(bibles)
    }

    /// Books of a bible, fetched and cached on a miss.
    #[instrument(skip(self), err)]
    pub async fn get_books(&self, bible_id: i64) -> DomainResult<Vec<Book>> {
        let _guard = self.lock_key(CacheKey::Bible(bible_id)).await;

        let cached = self.repo.list_books(bible_id).await?;
        if !cached.is_empty() {
            debug!(count = cached.len(), "book cache hit");
            return Ok(cached);
        }

        let books: Vec<Book> = self
            .fetcher
            .fetch_books(bible_id)
            .await?
            .into_iter()
            .map(|book| book.with_bible(bible_id))
            .collect();

        self.repo.insert_books(&books).await?;
        info!(count = books.len(), "cached fetched books");
        Ok(books)
    }

    /// A cached bible by id. Never fetches.
    #[instrument(skip(self), err)]
    pub async fn find_bible(&self, id: i64) -> DomainResult<Option<Bible>> {
        self.repo.find(id).await
    }

    /// Delete every cached bible and book.
    #[instrument(skip(self), err)]
    pub async fn clear(&self) -> DomainResult<()> {
        self.repo.clear().await?;
        info!("bible cache cleared");
        Ok(())
    }
}
