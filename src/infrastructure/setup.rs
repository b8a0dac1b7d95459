//! Project setup and initialization
//!
//! Handles `bible2ppt init`:
//! - Configuration directory creation
//! - Default config file creation
//! - Database schema creation
//! - Output directory creation

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::adapters::sqlite::initialize_database;

/// Name of the project-local directory holding config and data.
pub const PROJECT_DIR: &str = ".bible2ppt";

/// Default configuration template content
const DEFAULT_CONFIG_TEMPLATE: &str = r#"# Bible2PPT Configuration
# Override settings by editing this file, adding .bible2ppt/local.yaml,
# or setting environment variables with the BIBLE2PPT_ prefix.
#
# Example environment variables:
#   export BIBLE2PPT_DATABASE__PATH=/custom/path/bible2ppt.db
#   export BIBLE2PPT_LOGGING__LEVEL=debug
#   export BIBLE2PPT_SOURCE__KIND=http

database:
  # Path to SQLite database file (project-local)
  path: ".bible2ppt/bible2ppt.db"
  max_connections: 5

logging:
  # trace, debug, info, warn, error
  level: "info"
  # json, pretty
  format: "pretty"
  # Uncomment to also write rolling JSON log files
  # log_dir: ".bible2ppt/logs"
  rotation: "daily"

server:
  host: "127.0.0.1"
  port: 8000
  enable_cors: true

# Where bibles and books come from on a cache miss.
source:
  # static: built-in records, http: JSON source at base_url
  kind: "static"
  # base_url: "https://bible-source.example.com/api"
  timeout_secs: 30

output:
  dir: ".bible2ppt/output"
  # pptx (PowerPoint), odp (OpenDocument flat presentation) or json
  format: "pptx"
  # 0 puts every item on its own slide
  max_lines_per_slide: 0
  chars_per_line: 60

cache:
  # Serialize concurrent cache misses for the same key
  single_flight: true
"#;

/// Paths used during project initialization.
#[derive(Debug, Clone)]
pub struct SetupPaths {
    pub root: PathBuf,
    pub config_dir: PathBuf,
    pub config_file: PathBuf,
    pub database_file: PathBuf,
    pub output_dir: PathBuf,
}

impl SetupPaths {
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref().to_path_buf();
        let config_dir = root.join(PROJECT_DIR);

        Self {
            config_file: config_dir.join("config.yaml"),
            database_file: config_dir.join("bible2ppt.db"),
            output_dir: config_dir.join("output"),
            config_dir,
            root,
        }
    }

    /// Check if the project is already initialized
    pub fn is_initialized(&self) -> bool {
        self.config_file.exists() && self.database_file.exists()
    }
}

/// Create the configuration and output directories. Returns the
/// directories that did not exist before.
pub fn create_directories(paths: &SetupPaths) -> Result<Vec<PathBuf>> {
    let mut created = Vec::new();
    for dir in [&paths.config_dir, &paths.output_dir] {
        if !dir.exists() {
            fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
            created.push(dir.clone());
        }
    }
    Ok(created)
}

/// Write the default configuration file. Returns whether it was written.
pub fn create_config_file(paths: &SetupPaths, force: bool) -> Result<bool> {
    if paths.config_file.exists() && !force {
        return Ok(false);
    }

    fs::write(&paths.config_file, DEFAULT_CONFIG_TEMPLATE).context("Failed to write config file")?;

    Ok(true)
}

/// Create the database and apply the schema.
pub async fn run_migrations(paths: &SetupPaths) -> Result<()> {
    let db_url = format!("sqlite:{}", paths.database_file.display());
    let pool = initialize_database(&db_url, None)
        .await
        .context("Failed to initialize database")?;
    pool.close().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::Config;

    #[test]
    fn test_default_template_parses_to_default_config() {
        let parsed: Config = serde_yaml::from_str(DEFAULT_CONFIG_TEMPLATE).unwrap();
        let defaults = Config::default();
        assert_eq!(parsed.database.path, defaults.database.path);
        assert_eq!(parsed.server.port, defaults.server.port);
        assert_eq!(parsed.output.dir, defaults.output.dir);
        assert_eq!(parsed.source.kind, defaults.source.kind);
    }

    #[tokio::test]
    async fn test_full_setup_in_temp_dir() {
        let dir = tempfile::tempdir().unwrap();
        let paths = SetupPaths::new(dir.path());
        assert!(!paths.is_initialized());

        let created = create_directories(&paths).unwrap();
        assert_eq!(created.len(), 2);
        assert!(create_config_file(&paths, false).unwrap());
        assert!(!create_config_file(&paths, false).unwrap());
        run_migrations(&paths).await.unwrap();

        assert!(paths.is_initialized());
    }
}
