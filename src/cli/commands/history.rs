//! Build history commands.

use anyhow::{bail, Result};
use clap::{Args, Subcommand};

use crate::cli::output::{list_table, output, render_list, truncate, CommandOutput};
use crate::domain::models::{BuildRecord, BuildStatus, Config};
use crate::services::AppServices;

#[derive(Args, Debug)]
pub struct HistoryArgs {
    #[command(subcommand)]
    pub command: HistoryCommands,
}

#[derive(Subcommand, Debug)]
pub enum HistoryCommands {
    /// List recorded builds, newest first
    List {
        /// Show at most this many records
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Show one build record
    Show {
        /// Record ID
        id: i64,
    },
    /// Delete a build record
    Delete {
        /// Record ID
        id: i64,
    },
}

fn status_label(status: BuildStatus) -> &'static str {
    match status {
        BuildStatus::Success => "success",
        BuildStatus::Error => "error",
    }
}

#[derive(Debug, serde::Serialize)]
pub struct HistoryListOutput {
    pub records: Vec<BuildRecord>,
    pub total: usize,
}

impl CommandOutput for HistoryListOutput {
    fn to_human(&self) -> String {
        let mut table = list_table(&["id", "status", "title", "output", "created"]);
        for r in &self.records {
            let outcome = match (&r.output_path, &r.error) {
                (Some(path), _) => path.display().to_string(),
                (None, Some(error)) => error.clone(),
                (None, None) => String::new(),
            };
            table.add_row(vec![
                r.id.to_string(),
                status_label(r.status).to_string(),
                truncate(&r.title, 24),
                truncate(&outcome, 40),
                r.created_at.format("%Y-%m-%d %H:%M").to_string(),
            ]);
        }
        render_list("build record", &table, self.total)
    }
}

#[derive(Debug, serde::Serialize)]
pub struct HistoryRecordOutput {
    pub record: BuildRecord,
}

impl CommandOutput for HistoryRecordOutput {
    fn to_human(&self) -> String {
        let r = &self.record;
        let mut lines = vec![
            format!("Build {}: {}", r.id, r.title),
            format!("Status: {}", status_label(r.status)),
            format!("Created: {}", r.created_at.to_rfc3339()),
        ];
        if let Some(source_id) = r.source_id {
            lines.push(format!("Source: {source_id}"));
        }
        if let Some(path) = &r.output_path {
            lines.push(format!("Output: {}", path.display()));
        }
        if let Some(count) = r.slide_count {
            lines.push(format!("Slides: {count}"));
        }
        if let Some(error) = &r.error {
            lines.push(format!("Error: {error}"));
        }
        lines.push(format!("Items: {}", r.request.data.len()));
        lines.join("\n")
    }
}

#[derive(Debug, serde::Serialize)]
pub struct HistoryActionOutput {
    pub success: bool,
    pub message: String,
}

impl CommandOutput for HistoryActionOutput {
    fn to_human(&self) -> String {
        self.message.clone()
    }
}

pub async fn execute(args: HistoryArgs, config: &Config, json_mode: bool) -> Result<()> {
    let services = AppServices::from_config(config).await?;
    let builds = &services.builds;

    match args.command {
        HistoryCommands::List { limit } => {
            let mut records = builds.history().await?;
            let total = records.len();
            if let Some(limit) = limit {
                records.truncate(limit);
            }
            output(&HistoryListOutput { records, total }, json_mode);
        }
        HistoryCommands::Show { id } => {
            let Some(record) = builds.find_record(id).await? else {
                bail!("Build record not found: {id}");
            };
            output(&HistoryRecordOutput { record }, json_mode);
        }
        HistoryCommands::Delete { id } => {
            builds.delete_record(id).await?;
            let out = HistoryActionOutput {
                success: true,
                message: format!("Build record {id} deleted."),
            };
            output(&out, json_mode);
        }
    }

    Ok(())
}
