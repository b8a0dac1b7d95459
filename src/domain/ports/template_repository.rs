//! Template repository port.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{NewTemplate, Template};

/// Repository interface for Template persistence.
#[async_trait]
pub trait TemplateRepository: Send + Sync {
    /// Create a template and return it with its assigned id.
    async fn create(&self, template: &NewTemplate) -> DomainResult<Template>;

    async fn get(&self, id: i64) -> DomainResult<Option<Template>>;

    async fn list(&self) -> DomainResult<Vec<Template>>;

    /// Delete a template. Fails with `TemplateNotFound` if absent.
    async fn delete(&self, id: i64) -> DomainResult<()>;
}
