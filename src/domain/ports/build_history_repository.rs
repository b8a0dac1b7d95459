//! Build history repository port.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{BuildRecord, NewBuildRecord};

#[async_trait]
pub trait BuildHistoryRepository: Send + Sync {
    /// Store a build attempt and return it with its id and timestamp.
    async fn record(&self, record: &NewBuildRecord) -> DomainResult<BuildRecord>;

    /// All records, newest first.
    async fn list(&self) -> DomainResult<Vec<BuildRecord>>;

    async fn get(&self, id: i64) -> DomainResult<Option<BuildRecord>>;

    /// Delete a record. Fails with `BuildRecordNotFound` if absent.
    async fn delete(&self, id: i64) -> DomainResult<()>;
}
