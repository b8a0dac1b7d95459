//! SQLite implementation of the BuildHistoryRepository.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use std::path::PathBuf;

use super::parse_datetime;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{BuildRecord, BuildStatus, NewBuildRecord};
use crate::domain::ports::BuildHistoryRepository;

#[derive(Clone)]
pub struct SqliteBuildHistoryRepository {
    pool: SqlitePool,
}

impl SqliteBuildHistoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn status_str(status: BuildStatus) -> &'static str {
    match status {
        BuildStatus::Success => "success",
        BuildStatus::Error => "error",
    }
}

fn parse_status(s: &str) -> DomainResult<BuildStatus> {
    match s {
        "success" => Ok(BuildStatus::Success),
        "error" => Ok(BuildStatus::Error),
        other => Err(DomainError::SerializationError(format!("unknown build status: {other}"))),
    }
}

#[async_trait]
impl BuildHistoryRepository for SqliteBuildHistoryRepository {
    async fn record(&self, record: &NewBuildRecord) -> DomainResult<BuildRecord> {
        let now = Utc::now();
        let request = serde_json::to_string(&record.request)?;
        let output_path = record.output_path.as_ref().map(|p| p.to_string_lossy().into_owned());
        let slide_count = record.slide_count.and_then(|n| i64::try_from(n).ok());

        let result = sqlx::query(
            r"INSERT INTO build_history (status, title, source_id, request, output_path, slide_count, error, created_at)
              VALUES (?, ?, ?, ?, ?, ?, ?, ?)"
        )
        .bind(status_str(record.status))
        .bind(&record.title)
        .bind(record.source_id)
        .bind(&request)
        .bind(&output_path)
        .bind(slide_count)
        .bind(&record.error)
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(BuildRecord {
            id: result.last_insert_rowid(),
            status: record.status,
            title: record.title.clone(),
            source_id: record.source_id,
            request: record.request.clone(),
            output_path: record.output_path.clone(),
            slide_count: record.slide_count,
            error: record.error.clone(),
            created_at: now,
        })
    }

    async fn list(&self) -> DomainResult<Vec<BuildRecord>> {
        let rows: Vec<BuildRecordRow> = sqlx::query_as("SELECT * FROM build_history ORDER BY id DESC")
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn get(&self, id: i64) -> DomainResult<Option<BuildRecord>> {
        let row: Option<BuildRecordRow> = sqlx::query_as("SELECT * FROM build_history WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn delete(&self, id: i64) -> DomainResult<()> {
        let result = sqlx::query("DELETE FROM build_history WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::BuildRecordNotFound(id));
        }

        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct BuildRecordRow {
    id: i64,
    status: String,
    title: String,
    source_id: Option<i64>,
    request: String,
    output_path: Option<String>,
    slide_count: Option<i64>,
    error: Option<String>,
    created_at: String,
}

impl TryFrom<BuildRecordRow> for BuildRecord {
    type Error = DomainError;

    fn try_from(row: BuildRecordRow) -> Result<Self, Self::Error> {
        Ok(BuildRecord {
            id: row.id,
            status: parse_status(&row.status)?,
            title: row.title,
            source_id: row.source_id,
            request: serde_json::from_str(&row.request)?,
            output_path: row.output_path.map(PathBuf::from),
            slide_count: row.slide_count.and_then(|n| usize::try_from(n).ok()),
            error: row.error,
            created_at: parse_datetime(&row.created_at)?,
        })
    }
}
