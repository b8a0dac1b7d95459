//! Parsed verse reference model.

use serde::{Deserialize, Serialize};

/// Verse number used as "to the end of the chapter" when a query names a
/// whole chapter. No chapter in either testament is this long.
pub const WHOLE_CHAPTER: u32 = 200;

/// A resolved verse range such as `John 3:16-18`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedVerseQuery {
    pub book_name: String,
    pub book_abbreviation: String,
    pub book_id: i64,
    pub start_chapter: u32,
    pub start_verse: u32,
    pub end_chapter: u32,
    pub end_verse: u32,
}

impl ParsedVerseQuery {
    /// Human-readable label, e.g. `Genesis 1:1-2:3`.
    pub fn label(&self) -> String {
        let whole_chapters = self.start_verse == 1 && self.end_verse == WHOLE_CHAPTER;
        match (whole_chapters, self.start_chapter == self.end_chapter) {
            (true, true) => format!("{} {}", self.book_name, self.start_chapter),
            (true, false) => format!(
                "{} {}-{}",
                self.book_name, self.start_chapter, self.end_chapter
            ),
            (false, true) if self.start_verse == self.end_verse => format!(
                "{} {}:{}",
                self.book_name, self.start_chapter, self.start_verse
            ),
            (false, true) => format!(
                "{} {}:{}-{}",
                self.book_name, self.start_chapter, self.start_verse, self.end_verse
            ),
            (false, false) => format!(
                "{} {}:{}-{}:{}",
                self.book_name,
                self.start_chapter,
                self.start_verse,
                self.end_chapter,
                self.end_verse
            ),
        }
    }
}
