//! Domain errors for the Bible2PPT service.

use thiserror::Error;

/// Domain-level errors that can occur in the Bible2PPT service.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Bible not found: {0}")]
    BibleNotFound(i64),

    #[error("Template not found: {0}")]
    TemplateNotFound(i64),

    #[error("Build record not found: {0}")]
    BuildRecordNotFound(i64),

    #[error("Missing key in template data: {0}")]
    MissingTemplateKey(String),

    #[error("Malformed template: {0}")]
    MalformedTemplate(String),

    #[error("Fetch failed: {0}")]
    FetchFailed(String),

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Output error: {0}")]
    OutputError(String),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        DomainError::DatabaseError(err.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::SerializationError(err.to_string())
    }
}

impl From<std::io::Error> for DomainError {
    fn from(err: std::io::Error) -> Self {
        DomainError::OutputError(err.to_string())
    }
}
