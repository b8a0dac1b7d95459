//! Bible cache commands: `bibles`, `books`, `parse` and `clear-cache`.

use anyhow::{Context, Result};
use clap::Args;

use crate::cli::output::{list_table, output, render_list, truncate, CommandOutput};
use crate::domain::models::{Bible, Book, Config, ParsedVerseQuery};
use crate::services::{AppServices, VerseQueryParser};

#[derive(Args, Debug)]
pub struct BiblesArgs {
    /// Source identifier to list bibles for
    pub source_id: i64,
}

#[derive(Args, Debug)]
pub struct BooksArgs {
    /// Bible identifier
    pub bible_id: i64,
}

#[derive(Args, Debug)]
pub struct ParseArgs {
    /// Bible whose book names are used for matching
    pub bible_id: i64,

    /// Verse query, e.g. "John 3:16-18; Gen 1"
    pub query: String,
}

#[derive(Debug, serde::Serialize)]
pub struct BibleListOutput {
    pub source_id: i64,
    pub bibles: Vec<Bible>,
    pub total: usize,
}

impl CommandOutput for BibleListOutput {
    fn to_human(&self) -> String {
        let mut table = list_table(&["id", "name", "language"]);
        for bible in &self.bibles {
            table.add_row(vec![bible.id.to_string(), truncate(&bible.name, 40), bible.language.clone()]);
        }
        render_list("bible", &table, self.total)
    }
}

#[derive(Debug, serde::Serialize)]
pub struct BookListOutput {
    pub bible_id: i64,
    pub books: Vec<Book>,
    pub total: usize,
}

impl CommandOutput for BookListOutput {
    fn to_human(&self) -> String {
        let mut table = list_table(&["id", "name", "abbr", "chapters"]);
        for book in &self.books {
            table.add_row(vec![
                book.id.to_string(),
                book.name.clone(),
                book.abbreviation.clone(),
                book.chapter_count.to_string(),
            ]);
        }
        render_list("book", &table, self.total)
    }
}

#[derive(Debug, serde::Serialize)]
pub struct ParseOutput {
    pub query: String,
    pub references: Vec<ParsedVerseQuery>,
}

impl CommandOutput for ParseOutput {
    fn to_human(&self) -> String {
        if self.references.is_empty() {
            return format!("No verse references found in \"{}\".", self.query);
        }
        self.references
            .iter()
            .map(|r| format!("{} (book {})", r.label(), r.book_id))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, serde::Serialize)]
pub struct ClearCacheOutput {
    pub success: bool,
    pub message: String,
}

impl CommandOutput for ClearCacheOutput {
    fn to_human(&self) -> String {
        self.message.clone()
    }
}

pub async fn list_bibles(args: BiblesArgs, config: &Config, json_mode: bool) -> Result<()> {
    let services = AppServices::from_config(config).await?;
    let bibles = services
        .bibles
        .get_bibles(args.source_id)
        .await
        .with_context(|| format!("Failed to load bibles for source {}", args.source_id))?;

    let out = BibleListOutput {
        source_id: args.source_id,
        total: bibles.len(),
        bibles,
    };
    output(&out, json_mode);
    Ok(())
}

pub async fn list_books(args: BooksArgs, config: &Config, json_mode: bool) -> Result<()> {
    let services = AppServices::from_config(config).await?;
    let books = services
        .bibles
        .get_books(args.bible_id)
        .await
        .with_context(|| format!("Failed to load books for bible {}", args.bible_id))?;

    let out = BookListOutput {
        bible_id: args.bible_id,
        total: books.len(),
        books,
    };
    output(&out, json_mode);
    Ok(())
}

pub async fn parse(args: ParseArgs, config: &Config, json_mode: bool) -> Result<()> {
    let services = AppServices::from_config(config).await?;
    let books = services.bibles.get_books(args.bible_id).await?;
    let parser = VerseQueryParser::new(&books)?;

    let out = ParseOutput {
        references: parser.parse(&args.query),
        query: args.query,
    };
    output(&out, json_mode);
    Ok(())
}

pub async fn clear_cache(config: &Config, json_mode: bool) -> Result<()> {
    let services = AppServices::from_config(config).await?;
    services.bibles.clear().await.context("Failed to clear cache")?;

    output(
        &ClearCacheOutput {
            success: true,
            message: "Cleared cached bibles and books.".to_string(),
        },
        json_mode,
    );
    Ok(())
}
