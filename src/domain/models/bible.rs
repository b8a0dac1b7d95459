//! Bible and book domain models.
//!
//! Both are cached records: created when a cache miss triggers a fetch,
//! persisted immediately, never mutated afterwards, and removed only when
//! the whole cache is cleared.

use serde::{Deserialize, Serialize};

/// A bible translation published by a source.
///
/// `source_id` is the cache key. Every persisted bible carries the source
/// id of the request that fetched it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bible {
    /// Identifier assigned by the source (not unique across sources)
    pub id: i64,
    /// Source the bible was fetched from
    #[serde(default)]
    pub source_id: i64,
    /// Display name, e.g. "King James Version"
    #[serde(default)]
    pub name: String,
    /// Language tag, e.g. "en" or "ko"
    #[serde(default)]
    pub language: String,
}

impl Bible {
    pub fn new(id: i64, name: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            id,
            source_id: 0,
            name: name.into(),
            language: language.into(),
        }
    }

    /// Return this bible stamped with the given source id.
    pub fn with_source(mut self, source_id: i64) -> Self {
        self.source_id = source_id;
        self
    }
}

/// A book within a bible, e.g. Genesis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: i64,
    /// Owning bible (the cache key for books)
    #[serde(default)]
    pub bible_id: i64,
    pub name: String,
    #[serde(default)]
    pub abbreviation: String,
    /// Canonical position within the bible, starting at 1
    #[serde(default)]
    pub position: i64,
    #[serde(default)]
    pub chapter_count: i64,
}

impl Book {
    pub fn new(id: i64, name: impl Into<String>, abbreviation: impl Into<String>) -> Self {
        Self {
            id,
            bible_id: 0,
            name: name.into(),
            abbreviation: abbreviation.into(),
            position: id,
            chapter_count: 0,
        }
    }

    pub fn with_chapters(mut self, chapter_count: i64) -> Self {
        self.chapter_count = chapter_count;
        self
    }

    pub fn with_bible(mut self, bible_id: i64) -> Self {
        self.bible_id = bible_id;
        self
    }
}
