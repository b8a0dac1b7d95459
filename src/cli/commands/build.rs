//! Implementation of the `bible2ppt build` command.

use anyhow::{bail, Context, Result};
use clap::Args;
use serde_json::Value;
use std::path::PathBuf;

use crate::cli::output::{output, CommandOutput};
use crate::domain::models::{BuildOptions, BuildRequest, BuildResult, Config};
use crate::services::AppServices;

#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Deck title
    #[arg(short, long)]
    pub title: Option<String>,

    /// Slide items, in order
    pub items: Vec<String>,

    /// JSON file holding an array of items, placed after positional items
    #[arg(long)]
    pub data_file: Option<PathBuf>,

    /// Maximum estimated lines per content slide (0 = one item per slide)
    #[arg(long)]
    pub max_lines: Option<usize>,

    /// Characters per line used to estimate wrapping
    #[arg(long)]
    pub chars_per_line: Option<usize>,

    /// Output directory (overrides output.dir)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl BuildArgs {
    async fn request(&self, config: &Config) -> Result<BuildRequest> {
        let mut data: Vec<Value> = self.items.iter().cloned().map(Value::String).collect();

        if let Some(path) = &self.data_file {
            let raw = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?;
            match serde_json::from_str(&raw).with_context(|| format!("{} is not valid JSON", path.display()))? {
                Value::Array(items) => data.extend(items),
                _ => bail!("{} must contain a JSON array", path.display()),
            }
        }

        let options = (self.max_lines.is_some() || self.chars_per_line.is_some()).then(|| BuildOptions {
            max_lines_per_slide: self.max_lines.unwrap_or(config.output.max_lines_per_slide),
            chars_per_line: self.chars_per_line.unwrap_or(config.output.chars_per_line).max(1),
        });

        Ok(BuildRequest {
            title: self.title.clone(),
            data,
            options,
        })
    }
}

#[derive(Debug, serde::Serialize)]
pub struct BuildOutput {
    #[serde(flatten)]
    pub result: BuildResult,
}

impl CommandOutput for BuildOutput {
    fn to_human(&self) -> String {
        match (&self.result.output_path, self.result.slide_count) {
            (Some(path), Some(count)) => format!("Wrote {count} slide(s) to {}", path.display()),
            _ => format!("Build failed: {}", self.result.error.as_deref().unwrap_or("unknown error")),
        }
    }
}

pub async fn execute(args: BuildArgs, config: &Config, json_mode: bool) -> Result<()> {
    let request = args.request(config).await?;

    let mut config = config.clone();
    if let Some(dir) = &args.output {
        config.output.dir.clone_from(dir);
    }
    let services = AppServices::from_config(&config).await?;
    let result = services.builds.process_build_data(&request).await;

    if !result.is_success() {
        bail!(result.error.unwrap_or_else(|| "deck build failed".to_string()));
    }
    output(&BuildOutput { result }, json_mode);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn args() -> BuildArgs {
        BuildArgs {
            title: Some("Sunday".to_string()),
            items: vec!["In the beginning".to_string()],
            data_file: None,
            max_lines: None,
            chars_per_line: None,
            output: None,
        }
    }

    #[tokio::test]
    async fn test_request_appends_data_file_items() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"["second", {{"verse": 3}}]"#).unwrap();
        file.flush().unwrap();

        let args = BuildArgs {
            data_file: Some(file.path().to_path_buf()),
            ..args()
        };
        let request = args.request(&Config::default()).await.unwrap();
        assert_eq!(request.item_texts(), vec!["In the beginning", "second", r#"{"verse":3}"#]);
        assert!(request.options.is_none());
    }

    #[tokio::test]
    async fn test_request_options_fall_back_to_config() {
        let args = BuildArgs {
            max_lines: Some(4),
            ..args()
        };
        let request = args.request(&Config::default()).await.unwrap();
        let options = request.options.unwrap();
        assert_eq!(options.max_lines_per_slide, 4);
        assert_eq!(options.chars_per_line, 60);
    }

    fn temp_config(dir: &std::path::Path) -> Config {
        let mut config = Config::default();
        config.database.path = dir.join("bible2ppt.db").to_string_lossy().into_owned();
        config
    }

    #[tokio::test]
    async fn test_execute_writes_deck_and_records_it() {
        let dir = tempfile::tempdir().unwrap();
        let config = temp_config(dir.path());
        let args = BuildArgs {
            output: Some(dir.path().join("out")),
            ..args()
        };

        execute(args, &config, true).await.unwrap();

        assert!(dir.path().join("out/Sunday.pptx").exists());
        let services = AppServices::from_config(&config).await.unwrap();
        let history = services.builds.history().await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].title, "Sunday");
    }
}
