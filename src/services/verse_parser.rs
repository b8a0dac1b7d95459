//! Verse reference parsing against a bible's books.
//!
//! Accepts `;`-separated references such as `John 3:16-18; Gen 1`. Book
//! names and abbreviations match case-insensitively, preferring the
//! longest name. Unknown books, unparsable parts, zero chapter or verse
//! numbers and reversed ranges are skipped with a warning rather than
//! failing the whole query.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use regex::{Captures, Regex};
use tracing::warn;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Book, ParsedVerseQuery, WHOLE_CHAPTER};

#[derive(Debug, Clone)]
struct BookAlias {
    name: String,
    abbreviation: String,
    book_id: i64,
}

/// Parser bound to one bible's book list.
#[derive(Debug)]
pub struct VerseQueryParser {
    aliases: HashMap<String, BookAlias>,
    pattern: Option<Regex>,
}

impl VerseQueryParser {
    pub fn new(books: &[Book]) -> DomainResult<Self> {
        let mut aliases = HashMap::new();
        let mut names: Vec<&str> = Vec::new();

        for book in books {
            let alias = BookAlias {
                name: book.name.clone(),
                abbreviation: book.abbreviation.clone(),
                book_id: book.id,
            };
            for name in [book.name.as_str(), book.abbreviation.as_str()] {
                let name = name.trim();
                if name.is_empty() {
                    continue;
                }
                // One alternation entry per case-insensitive name.
                if let Entry::Vacant(slot) = aliases.entry(name.to_lowercase()) {
                    slot.insert(alias.clone());
                    names.push(name);
                }
            }
        }

        // Longest first so "1 John" wins over "John".
        names.sort_by_key(|name| std::cmp::Reverse(name.chars().count()));

        let pattern = if names.is_empty() {
            None
        } else {
            let alternation = names.iter().map(|name| regex::escape(name)).collect::<Vec<_>>().join("|");
            let source = format!(
                r"(?i)(?P<book>{alternation})\s*(?P<chapter>\d+)(?:\s*[:.장]?\s*(?P<verse>\d+))?(?:\s*-\s*(?P<to>\d+)(?:\s*[:.장]?\s*(?P<to_verse>\d+))?)?"
            );
            let regex = Regex::new(&source)
                .map_err(|e| DomainError::ValidationFailed(format!("invalid book names: {e}")))?;
            Some(regex)
        };

        Ok(Self { aliases, pattern })
    }

    /// Parse a query into verse ranges.
    pub fn parse(&self, query: &str) -> Vec<ParsedVerseQuery> {
        let Some(pattern) = &self.pattern else {
            warn!("no books loaded, cannot parse verse query");
            return Vec::new();
        };

        let mut results = Vec::new();
        for part in query.split(';').map(str::trim).filter(|part| !part.is_empty()) {
            let before = results.len();
            let mut matched = false;

            for caps in pattern.captures_iter(part) {
                matched = true;
                if let Some(parsed) = self.resolve(&caps) {
                    results.push(parsed);
                }
            }

            if !matched {
                warn!(part, "could not parse verse query part");
            } else if results.len() == before {
                warn!(part, "verse query part produced no ranges");
            }
        }
        results
    }

    fn resolve(&self, caps: &Captures<'_>) -> Option<ParsedVerseQuery> {
        let book_input = caps.name("book")?.as_str();
        let Some(alias) = self.aliases.get(&book_input.to_lowercase()) else {
            warn!(book = book_input, "book not found");
            return None;
        };

        let number = |name: &str| -> Option<Option<u32>> {
            match caps.name(name) {
                None => Some(None),
                Some(m) => m.as_str().parse().ok().map(Some),
            }
        };
        let (Some(Some(start_chapter)), Some(verse), Some(to), Some(to_verse)) =
            (number("chapter"), number("verse"), number("to"), number("to_verse"))
        else {
            warn!(reference = %&caps[0], "number out of range");
            return None;
        };

        let start_verse = verse.unwrap_or(1);
        let (end_chapter, end_verse) = match (to, to_verse, verse) {
            // Gen 1:3-2:5 or Gen 1-2:5
            (Some(chapter), Some(v), _) => (chapter, v),
            // Gen 1:3-5
            (Some(v), None, Some(_)) => (start_chapter, v),
            // Gen 1-2
            (Some(chapter), None, None) => (chapter, WHOLE_CHAPTER),
            // Gen 1:3
            (None, _, Some(v)) => (start_chapter, v),
            // Gen 1
            (None, _, None) => (start_chapter, WHOLE_CHAPTER),
        };

        if [start_chapter, start_verse, end_chapter, end_verse].contains(&0) {
            warn!(reference = %&caps[0], "chapters and verses start at 1");
            return None;
        }

        if (end_chapter, end_verse) < (start_chapter, start_verse) {
            warn!(reference = %&caps[0], "range ends before it starts");
            return None;
        }

        Some(ParsedVerseQuery {
            book_name: alias.name.clone(),
            book_abbreviation: alias.abbreviation.clone(),
            book_id: alias.book_id,
            start_chapter,
            start_verse,
            end_chapter,
            end_verse,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn books() -> Vec<Book> {
        vec![
            Book::new(1, "Genesis", "Gen"),
            Book::new(43, "John", "Jn"),
            Book::new(62, "1 John", "1Jn"),
            Book::new(100, "창세기", "창"),
        ]
    }

    fn parse(query: &str) -> Vec<ParsedVerseQuery> {
        VerseQueryParser::new(&books()).unwrap().parse(query)
    }

    fn range(q: &ParsedVerseQuery) -> (u32, u32, u32, u32) {
        (q.start_chapter, q.start_verse, q.end_chapter, q.end_verse)
    }

    #[test]
    fn test_whole_chapter() {
        let parsed = parse("Genesis 1");
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].book_id, 1);
        assert_eq!(range(&parsed[0]), (1, 1, 1, WHOLE_CHAPTER));
    }

    #[test]
    fn test_single_verse_and_verse_range() {
        assert_eq!(range(&parse("Gen 1:3")[0]), (1, 3, 1, 3));
        assert_eq!(range(&parse("gen 1:3-5")[0]), (1, 3, 1, 5));
        assert_eq!(range(&parse("Jn 3.16")[0]), (3, 16, 3, 16));
    }

    #[test]
    fn test_chapter_ranges() {
        assert_eq!(range(&parse("Gen 1-2")[0]), (1, 1, 2, WHOLE_CHAPTER));
        assert_eq!(range(&parse("Gen 1:3-2:5")[0]), (1, 3, 2, 5));
        assert_eq!(range(&parse("Gen 1 - 2:5")[0]), (1, 1, 2, 5));
    }

    #[test]
    fn test_longest_name_wins() {
        let parsed = parse("1 John 2:1");
        assert_eq!(parsed[0].book_name, "1 John");
        assert_eq!(parse("1Jn 2")[0].book_id, 62);
        assert_eq!(parse("John 2")[0].book_id, 43);
    }

    #[test]
    fn test_multiple_parts() {
        let parsed = parse("John 3:16-18; Gen 1 ;");
        let labels: Vec<_> = parsed.iter().map(ParsedVerseQuery::label).collect();
        assert_eq!(labels, vec!["John 3:16-18", "Genesis 1"]);
    }

    #[test]
    fn test_korean_delimiters() {
        let parsed = parse("창 1장 3");
        assert_eq!(parsed[0].book_name, "창세기");
        assert_eq!(range(&parsed[0]), (1, 3, 1, 3));
    }

    #[test]
    fn test_unknown_and_invalid_parts_are_skipped() {
        assert!(parse("Hezekiah 1:1").is_empty());
        assert!(parse("Gen 2:5-1:1").is_empty());
        assert!(parse("Gen 99999999999").is_empty());
        assert_eq!(parse("nonsense; Gen 1:1").len(), 1);
    }

    #[test]
    fn test_zero_chapter_or_verse_is_skipped() {
        assert!(parse("Gen 0").is_empty());
        assert!(parse("Gen 1:0").is_empty());
        assert!(parse("Gen 1:3-0").is_empty());
        assert!(parse("Gen 1-0:5").is_empty());
        assert_eq!(parse("Gen 0:1; Gen 2:1").len(), 1);
    }

    #[test]
    fn test_case_variants_share_one_alternative() {
        let parser = VerseQueryParser::new(&[
            Book::new(1, "Genesis", "Gen"),
            Book::new(1, "genesis", "GEN"),
        ])
        .unwrap();

        let pattern = parser.pattern.as_ref().unwrap().as_str();
        assert!(pattern.contains("(?P<book>Genesis|Gen)"), "{pattern}");
        assert_eq!(parser.parse("gEn 1:1")[0].book_name, "Genesis");
    }

    #[test]
    fn test_no_books_yields_nothing() {
        let parser = VerseQueryParser::new(&[]).unwrap();
        assert!(parser.parse("Gen 1").is_empty());
    }

    #[test]
    fn test_book_names_are_escaped() {
        let parser = VerseQueryParser::new(&[Book::new(1, "Song (of Songs)", "Song.")]).unwrap();
        assert_eq!(parser.parse("Song (of Songs) 2:1")[0].book_id, 1);
    }
}
