//! SQLite implementation of the BibleRepository.

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::domain::errors::DomainResult;
use crate::domain::models::{Bible, Book};
use crate::domain::ports::BibleRepository;

#[derive(Clone)]
pub struct SqliteBibleRepository {
    pool: SqlitePool,
}

impl SqliteBibleRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BibleRepository for SqliteBibleRepository {
    async fn list_by_source(&self, source_id: i64) -> DomainResult<Vec<Bible>> {
        let rows: Vec<BibleRow> = sqlx::query_as(
            "SELECT id, source_id, name, language FROM bibles WHERE source_id = ? ORDER BY row_id"
        )
        .bind(source_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Bible::from).collect())
    }

    async fn find(&self, id: i64) -> DomainResult<Option<Bible>> {
        let row: Option<BibleRow> = sqlx::query_as(
            "SELECT id, source_id, name, language FROM bibles WHERE id = ? ORDER BY row_id LIMIT 1"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Bible::from))
    }

    async fn insert_bibles(&self, bibles: &[Bible]) -> DomainResult<()> {
        let mut tx = self.pool.begin().await?;
        for bible in bibles {
            sqlx::query("INSERT INTO bibles (id, source_id, name, language) VALUES (?, ?, ?, ?)")
                .bind(bible.id)
                .bind(bible.source_id)
                .bind(&bible.name)
                .bind(&bible.language)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn list_books(&self, bible_id: i64) -> DomainResult<Vec<Book>> {
        let rows: Vec<BookRow> = sqlx::query_as(
            r#"SELECT id, bible_id, name, abbreviation, position, chapter_count
               FROM books WHERE bible_id = ? ORDER BY position, row_id"#
        )
        .bind(bible_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Book::from).collect())
    }

    async fn insert_books(&self, books: &[Book]) -> DomainResult<()> {
        let mut tx = self.pool.begin().await?;
        for book in books {
            sqlx::query(
                r#"INSERT INTO books (id, bible_id, name, abbreviation, position, chapter_count)
                   VALUES (?, ?, ?, ?, ?, ?)"#
            )
            .bind(book.id)
            .bind(book.bible_id)
            .bind(&book.name)
            .bind(&book.abbreviation)
            .bind(book.position)
            .bind(book.chapter_count)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn clear(&self) -> DomainResult<()> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM books").execute(&mut *tx).await?;
        sqlx::query("DELETE FROM bibles").execute(&mut *tx).await?;
        tx.commit().await?;
        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct BibleRow {
    id: i64,
    source_id: i64,
    name: String,
    language: String,
}

impl From<BibleRow> for Bible {
    fn from(row: BibleRow) -> Self {
        Self {
            id: row.id,
            source_id: row.source_id,
            name: row.name,
            language: row.language,
        }
    }
}

#[derive(sqlx::FromRow)]
struct BookRow {
    id: i64,
    bible_id: i64,
    name: String,
    abbreviation: String,
    position: i64,
    chapter_count: i64,
}

impl From<BookRow> for Book {
    fn from(row: BookRow) -> Self {
        Self {
            id: row.id,
            bible_id: row.bible_id,
            name: row.name,
            abbreviation: row.abbreviation,
            position: row.position,
            chapter_count: row.chapter_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::create_migrated_test_pool;

    async fn setup_test_repo() -> SqliteBibleRepository {
        let pool = create_migrated_test_pool().await.unwrap();
        SqliteBibleRepository::new(pool)
    }

    #[tokio::test]
    async fn test_insert_and_list_by_source() {
        let repo = setup_test_repo().await;
        let bibles = vec![
            Bible::new(1, "KJV", "en").with_source(7),
            Bible::new(2, "ESV", "en").with_source(7),
            Bible::new(3, "RVSN", "ko").with_source(8),
        ];
        repo.insert_bibles(&bibles).await.unwrap();

        let found = repo.list_by_source(7).await.unwrap();
        assert_eq!(found, bibles[..2].to_vec());
        assert!(repo.list_by_source(9).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_ids_are_stored() {
        let repo = setup_test_repo().await;
        let bible = Bible::new(1, "KJV", "en").with_source(7);
        repo.insert_bibles(&[bible.clone()]).await.unwrap();
        repo.insert_bibles(&[bible]).await.unwrap();

        assert_eq!(repo.list_by_source(7).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_find_returns_first_match() {
        let repo = setup_test_repo().await;
        repo.insert_bibles(&[Bible::new(5, "KJV", "en").with_source(7)]).await.unwrap();

        let found = repo.find(5).await.unwrap().unwrap();
        assert_eq!(found.source_id, 7);
        assert!(repo.find(6).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_books_ordered_by_position() {
        let repo = setup_test_repo().await;
        let mut exodus = Book::new(2, "Exodus", "Ex").with_bible(1);
        exodus.position = 2;
        let mut genesis = Book::new(1, "Genesis", "Gen").with_bible(1);
        genesis.position = 1;
        repo.insert_books(&[exodus, genesis]).await.unwrap();

        let books = repo.list_books(1).await.unwrap();
        let names: Vec<_> = books.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["Genesis", "Exodus"]);
    }

    #[tokio::test]
    async fn test_clear_removes_bibles_and_books() {
        let repo = setup_test_repo().await;
        repo.insert_bibles(&[Bible::new(1, "KJV", "en").with_source(7)]).await.unwrap();
        repo.insert_books(&[Book::new(1, "Genesis", "Gen").with_bible(1)]).await.unwrap();

        repo.clear().await.unwrap();

        assert!(repo.list_by_source(7).await.unwrap().is_empty());
        assert!(repo.list_books(1).await.unwrap().is_empty());
    }
}
