use anyhow::{Context, Result};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use thiserror::Error;

use crate::domain::models::config::{Config, SourceKind};

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Database path cannot be empty")]
    EmptyDatabasePath,

    #[error("Invalid max_connections: {0}. Must be at least 1")]
    InvalidMaxConnections(u32),

    #[error("source.base_url is required when source.kind is http")]
    MissingSourceUrl,

    #[error("Invalid source.base_url: {0}. Must start with http:// or https://")]
    InvalidSourceUrl(String),

    #[error("Invalid timeout_secs: {0}. Must be at least 1")]
    InvalidTimeout(u64),

    #[error("Invalid chars_per_line: {0}. Must be at least 1")]
    InvalidCharsPerLine(usize),

    #[error("Output directory cannot be empty")]
    EmptyOutputDir,
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .bible2ppt/config.yaml (project config, created by init)
    /// 3. .bible2ppt/local.yaml (project local overrides, optional)
    /// 4. Environment variables (BIBLE2PPT_* prefix, highest priority)
    pub fn load() -> Result<Config> {
        let config: Config = Self::figment()
            .merge(Env::prefixed("BIBLE2PPT_").split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file, still honoring environment
    /// overrides.
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .merge(Env::prefixed("BIBLE2PPT_").split("__"))
            .extract()
            .with_context(|| format!("Failed to load config from {}", path.as_ref().display()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    fn figment() -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(".bible2ppt/config.yaml"))
            .merge(Yaml::file(".bible2ppt/local.yaml"))
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.database.path.is_empty() {
            return Err(ConfigError::EmptyDatabasePath);
        }

        if config.database.max_connections == 0 {
            return Err(ConfigError::InvalidMaxConnections(config.database.max_connections));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        if config.source.kind == SourceKind::Http {
            let url = config.source.base_url.as_deref().ok_or(ConfigError::MissingSourceUrl)?;
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::InvalidSourceUrl(url.to_string()));
            }
        }

        if config.source.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout(config.source.timeout_secs));
        }

        if config.output.chars_per_line == 0 {
            return Err(ConfigError::InvalidCharsPerLine(config.output.chars_per_line));
        }

        if config.output.dir.as_os_str().is_empty() {
            return Err(ConfigError::EmptyOutputDir);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::config::{DeckFormat, RotationPolicy};

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.database.path, ".bible2ppt/bible2ppt.db");
        assert_eq!(config.database.url(), "sqlite:.bible2ppt/bible2ppt.db");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.source.kind, SourceKind::Static);
        assert_eq!(config.output.format, DeckFormat::Pptx);
        assert!(config.cache.single_flight);
        ConfigLoader::validate(&config).expect("Default config should be valid");
    }

    #[test]
    fn test_yaml_parsing() {
        let yaml = r"
database:
  path: /custom/path.db
  max_connections: 2
logging:
  level: debug
  format: json
  rotation: hourly
source:
  kind: http
  base_url: https://bibles.example.com
output:
  format: json
  max_lines_per_slide: 6
cache:
  single_flight: false
";

        let config: Config = serde_yaml::from_str(yaml).expect("YAML should parse");

        assert_eq!(config.database.path, "/custom/path.db");
        assert_eq!(config.database.max_connections, 2);
        assert_eq!(config.logging.rotation, RotationPolicy::Hourly);
        assert_eq!(config.source.kind, SourceKind::Http);
        assert_eq!(config.output.format, DeckFormat::Json);
        assert_eq!(config.output.max_lines_per_slide, 6);
        assert_eq!(config.output.chars_per_line, 60);
        assert!(!config.cache.single_flight);

        ConfigLoader::validate(&config).expect("Parsed config should be valid");
    }

    #[test]
    fn test_validate_invalid_log_level() {
        let mut config = Config::default();
        config.logging.level = "invalid".to_string();

        match ConfigLoader::validate(&config).unwrap_err() {
            ConfigError::InvalidLogLevel(level) => assert_eq!(level, "invalid"),
            other => panic!("Expected InvalidLogLevel error, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_invalid_log_format() {
        let mut config = Config::default();
        config.logging.format = "xml".to_string();

        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::InvalidLogFormat(_)
        ));
    }

    #[test]
    fn test_validate_empty_database_path() {
        let mut config = Config::default();
        config.database.path = String::new();

        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::EmptyDatabasePath
        ));
    }

    #[test]
    fn test_validate_zero_max_connections() {
        let mut config = Config::default();
        config.database.max_connections = 0;

        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::InvalidMaxConnections(0)
        ));
    }

    #[test]
    fn test_validate_http_source_requires_url() {
        let mut config = Config::default();
        config.source.kind = SourceKind::Http;

        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::MissingSourceUrl
        ));

        config.source.base_url = Some("ftp://bibles".to_string());
        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::InvalidSourceUrl(_)
        ));
    }

    #[test]
    fn test_validate_zero_timeout_and_line_width() {
        let mut config = Config::default();
        config.source.timeout_secs = 0;
        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::InvalidTimeout(0)
        ));

        let mut config = Config::default();
        config.output.chars_per_line = 0;
        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::InvalidCharsPerLine(0)
        ));
    }

    #[test]
    fn test_hierarchical_merging() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let mut base_file = NamedTempFile::new().unwrap();
        writeln!(base_file, "server:\n  port: 9000\nlogging:\n  level: info\n  format: json").unwrap();
        base_file.flush().unwrap();

        let mut override_file = NamedTempFile::new().unwrap();
        writeln!(override_file, "server:\n  port: 9100\nlogging:\n  level: debug").unwrap();
        override_file.flush().unwrap();

        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(base_file.path()))
            .merge(Yaml::file(override_file.path()))
            .extract()
            .unwrap();

        assert_eq!(config.server.port, 9100, "Override should win");
        assert_eq!(config.logging.level, "debug", "Override should win for nested fields");
        assert_eq!(config.logging.format, "json", "Base value should persist when not overridden");
        assert_eq!(config.server.host, "127.0.0.1", "Defaults fill the rest");
    }

    #[test]
    fn test_load_from_file_validates() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "database:\n  max_connections: 0").unwrap();
        file.flush().unwrap();

        assert!(ConfigLoader::load_from_file(file.path()).is_err());
    }
}
