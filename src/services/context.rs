//! Service wiring shared by the CLI and the HTTP server.

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::adapters::fetch::fetcher_from_config;
use crate::adapters::sqlite::{
    initialize_database, PoolConfig, SqliteBibleRepository, SqliteBuildHistoryRepository, SqliteTemplateRepository,
};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::Config;
use crate::domain::ports::BibleFetcher;

use super::{BibleService, BuildService, TemplateService};

/// The services a running process needs, wired from configuration.
#[derive(Clone)]
pub struct AppServices {
    pub bibles: Arc<BibleService>,
    pub templates: Arc<TemplateService>,
    pub builds: Arc<BuildService>,
}

impl AppServices {
    /// Open the configured database and wire every service.
    pub async fn from_config(config: &Config) -> DomainResult<Self> {
        let pool = initialize_database(&config.database.url(), Some(PoolConfig::from(&config.database)))
            .await
            .map_err(|e| DomainError::DatabaseError(e.to_string()))?;
        let fetcher = fetcher_from_config(&config.source)?;
        Ok(Self::with_pool(pool, fetcher, config))
    }

    /// Wire services over an existing pool and fetcher.
    pub fn with_pool(pool: SqlitePool, fetcher: Arc<dyn BibleFetcher>, config: &Config) -> Self {
        let bibles = BibleService::new(Arc::new(SqliteBibleRepository::new(pool.clone())), fetcher)
            .with_single_flight(config.cache.single_flight);
        let templates = TemplateService::new(Arc::new(SqliteTemplateRepository::new(pool.clone())));
        let builds =
            BuildService::from_config(&config.output).with_history(Arc::new(SqliteBuildHistoryRepository::new(pool)));

        Self {
            bibles: Arc::new(bibles),
            templates: Arc::new(templates),
            builds: Arc::new(builds),
        }
    }
}
