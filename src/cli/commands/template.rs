//! Template CLI commands.

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use serde_json::{Map, Value};
use std::path::PathBuf;

use crate::cli::output::{list_table, output, render_list, truncate, CommandOutput};
use crate::domain::models::{Config, Template};
use crate::services::AppServices;

#[derive(Args, Debug)]
pub struct TemplateArgs {
    #[command(subcommand)]
    pub command: TemplateCommands,
}

#[derive(Subcommand, Debug)]
pub enum TemplateCommands {
    /// Store a new template
    Create {
        /// Template name
        name: String,
        /// Template content with {key} placeholders
        #[arg(short, long, conflicts_with = "file")]
        content: Option<String>,
        /// Read template content from a file
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// List stored templates
    List,
    /// Show a template
    Show {
        /// Template ID
        id: i64,
    },
    /// Delete a template
    Delete {
        /// Template ID
        id: i64,
    },
}

#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Template ID
    pub id: i64,

    /// Data as a JSON object
    #[arg(short, long)]
    pub data: Option<String>,

    /// Individual values as key=value (applied after --data)
    #[arg(short, long = "set", value_name = "KEY=VALUE")]
    pub set: Vec<String>,
}

impl RenderArgs {
    fn data_map(&self) -> Result<Map<String, Value>> {
        let mut data = match &self.data {
            Some(raw) => match serde_json::from_str(raw).context("--data must be valid JSON")? {
                Value::Object(map) => map,
                _ => bail!("--data must be a JSON object"),
            },
            None => Map::new(),
        };
        for pair in &self.set {
            let Some((key, value)) = pair.split_once('=') else {
                bail!("Invalid --set value '{pair}', expected KEY=VALUE");
            };
            data.insert(key.to_string(), Value::String(value.to_string()));
        }
        Ok(data)
    }
}

#[derive(Debug, serde::Serialize)]
pub struct TemplateOutput {
    pub template: Template,
}

impl CommandOutput for TemplateOutput {
    fn to_human(&self) -> String {
        let t = &self.template;
        format!(
            "Template {}: {}\nCreated: {}\nUpdated: {}\n\n{}",
            t.id,
            t.name,
            t.created_at.to_rfc3339(),
            t.updated_at.to_rfc3339(),
            t.content
        )
    }
}

#[derive(Debug, serde::Serialize)]
pub struct TemplateListOutput {
    pub templates: Vec<Template>,
    pub total: usize,
}

impl CommandOutput for TemplateListOutput {
    fn to_human(&self) -> String {
        let mut table = list_table(&["id", "name", "content", "updated"]);
        for t in &self.templates {
            table.add_row(vec![
                t.id.to_string(),
                truncate(&t.name, 24),
                truncate(&t.content.replace('\n', " "), 40),
                t.updated_at.format("%Y-%m-%d %H:%M").to_string(),
            ]);
        }
        render_list("template", &table, self.total)
    }
}

#[derive(Debug, serde::Serialize)]
pub struct TemplateActionOutput {
    pub success: bool,
    pub message: String,
}

impl CommandOutput for TemplateActionOutput {
    fn to_human(&self) -> String {
        self.message.clone()
    }
}

#[derive(Debug, serde::Serialize)]
pub struct RenderOutput {
    pub template_id: i64,
    pub rendered: String,
}

impl CommandOutput for RenderOutput {
    fn to_human(&self) -> String {
        self.rendered.clone()
    }
}

pub async fn execute(args: TemplateArgs, config: &Config, json_mode: bool) -> Result<()> {
    let services = AppServices::from_config(config).await?;
    let templates = &services.templates;

    match args.command {
        TemplateCommands::Create { name, content, file } => {
            let content = match (content, file) {
                (Some(content), _) => content,
                (None, Some(path)) => tokio::fs::read_to_string(&path)
                    .await
                    .with_context(|| format!("Failed to read {}", path.display()))?,
                (None, None) => bail!("Provide template content with --content or --file"),
            };
            let template = templates.create_template(&name, &content).await?;
            output(&TemplateOutput { template }, json_mode);
        }
        TemplateCommands::List => {
            let list = templates.list_templates().await?;
            let out = TemplateListOutput {
                total: list.len(),
                templates: list,
            };
            output(&out, json_mode);
        }
        TemplateCommands::Show { id } => {
            let Some(template) = templates.load_template(id).await? else {
                bail!("Template not found: {id}");
            };
            output(&TemplateOutput { template }, json_mode);
        }
        TemplateCommands::Delete { id } => {
            templates.delete_template(id).await?;
            let out = TemplateActionOutput {
                success: true,
                message: format!("Template {id} deleted."),
            };
            output(&out, json_mode);
        }
    }

    Ok(())
}

pub async fn render(args: RenderArgs, config: &Config, json_mode: bool) -> Result<()> {
    let data = args.data_map()?;
    let services = AppServices::from_config(config).await?;
    let rendered = services.templates.render(args.id, &data).await?;

    output(
        &RenderOutput {
            template_id: args.id,
            rendered,
        },
        json_mode,
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render_args(data: Option<&str>, set: &[&str]) -> RenderArgs {
        RenderArgs {
            id: 1,
            data: data.map(str::to_string),
            set: set.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    #[test]
    fn test_data_map_merges_set_over_json() {
        let args = render_args(Some(r#"{"title": "Psalms", "count": 3}"#), &["title=John", "note=a=b"]);
        let data = args.data_map().unwrap();
        assert_eq!(data["title"], "John");
        assert_eq!(data["count"], 3);
        assert_eq!(data["note"], "a=b");
    }

    #[test]
    fn test_data_map_rejects_bad_input() {
        assert!(render_args(Some("[1, 2]"), &[]).data_map().is_err());
        assert!(render_args(Some("{not json"), &[]).data_map().is_err());
        assert!(render_args(None, &["novalue"]).data_map().is_err());
    }
}
