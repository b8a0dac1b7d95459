//! SQLite implementation of the TemplateRepository.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

use super::parse_datetime;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{NewTemplate, Template};
use crate::domain::ports::TemplateRepository;

#[derive(Clone)]
pub struct SqliteTemplateRepository {
    pool: SqlitePool,
}

impl SqliteTemplateRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TemplateRepository for SqliteTemplateRepository {
    async fn create(&self, template: &NewTemplate) -> DomainResult<Template> {
        let now = Utc::now();
        let result = sqlx::query(
            "INSERT INTO templates (name, content, created_at, updated_at) VALUES (?, ?, ?, ?)"
        )
        .bind(&template.name)
        .bind(&template.content)
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(Template {
            id: result.last_insert_rowid(),
            name: template.name.clone(),
            content: template.content.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    async fn get(&self, id: i64) -> DomainResult<Option<Template>> {
        let row: Option<TemplateRow> = sqlx::query_as("SELECT * FROM templates WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn list(&self) -> DomainResult<Vec<Template>> {
        let rows: Vec<TemplateRow> = sqlx::query_as("SELECT * FROM templates ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn delete(&self, id: i64) -> DomainResult<()> {
        let result = sqlx::query("DELETE FROM templates WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::TemplateNotFound(id));
        }

        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct TemplateRow {
    id: i64,
    name: String,
    content: String,
    created_at: String,
    updated_at: String,
}

impl TryFrom<TemplateRow> for Template {
    type Error = DomainError;

    fn try_from(row: TemplateRow) -> Result<Self, Self::Error> {
        Ok(Template {
            id: row.id,
            name: row.name,
            content: row.content,
            created_at: parse_datetime(&row.created_at)?,
            updated_at: parse_datetime(&row.updated_at)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::create_migrated_test_pool;

    async fn setup_test_repo() -> SqliteTemplateRepository {
        let pool = create_migrated_test_pool().await.unwrap();
        SqliteTemplateRepository::new(pool)
    }

    #[tokio::test]
    async fn test_create_and_get_template() {
        let repo = setup_test_repo().await;
        let created = repo
            .create(&NewTemplate::new("verse", "{book} {chapter}:{verse}"))
            .await
            .unwrap();

        let loaded = repo.get(created.id).await.unwrap().unwrap();
        assert_eq!(loaded.name, "verse");
        assert_eq!(loaded.content, "{book} {chapter}:{verse}");
    }

    #[tokio::test]
    async fn test_list_in_creation_order() {
        let repo = setup_test_repo().await;
        repo.create(&NewTemplate::new("a", "A")).await.unwrap();
        repo.create(&NewTemplate::new("b", "B")).await.unwrap();

        let names: Vec<_> = repo.list().await.unwrap().into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_delete_missing_template() {
        let repo = setup_test_repo().await;
        let err = repo.delete(42).await.unwrap_err();
        assert!(matches!(err, DomainError::TemplateNotFound(42)));
    }
}
