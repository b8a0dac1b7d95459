//! Command-line interface.

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use commands::bible::{BiblesArgs, BooksArgs, ParseArgs};
use commands::build::BuildArgs;
use commands::history::HistoryArgs;
use commands::init::InitArgs;
use commands::serve::ServeArgs;
use commands::template::{RenderArgs, TemplateArgs};

#[derive(Parser, Debug)]
#[command(name = "bible2ppt")]
#[command(about = "Bible2PPT - scripture slide deck builder", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Configuration file to use instead of .bible2ppt/config.yaml
    #[arg(long, global = true, env = "BIBLE2PPT_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize configuration, output directory and database
    Init(InitArgs),
    /// Run the HTTP API server
    Serve(ServeArgs),
    /// List bibles for a source, fetching them on a cache miss
    Bibles(BiblesArgs),
    /// List books of a bible, fetching them on a cache miss
    Books(BooksArgs),
    /// Delete every cached bible and book
    ClearCache,
    /// Template management commands
    Template(TemplateArgs),
    /// Render a stored template with data
    Render(RenderArgs),
    /// Build a slide deck from items
    Build(BuildArgs),
    /// Inspect recorded builds
    History(HistoryArgs),
    /// Parse verse references against a bible's books
    Parse(ParseArgs),
}

/// Report a command failure and exit with status 1.
pub fn handle_error(err: anyhow::Error, json_mode: bool) -> ! {
    if json_mode {
        let body = serde_json::json!({
            "success": false,
            "error": format!("{err:#}"),
        });
        println!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
    } else {
        eprintln!("Error: {err:#}");
    }
    std::process::exit(1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["bible2ppt", "bibles", "7", "--json"]).unwrap();
        assert!(cli.json);
        assert!(matches!(cli.command, Commands::Bibles(BiblesArgs { source_id: 7 })));
    }

    #[test]
    fn test_parse_history_commands() {
        let cli = Cli::try_parse_from(["bible2ppt", "history", "list", "--limit", "5"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::History(HistoryArgs {
                command: commands::history::HistoryCommands::List { limit: Some(5) }
            })
        ));

        let cli = Cli::try_parse_from(["bible2ppt", "history", "delete", "3"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::History(HistoryArgs {
                command: commands::history::HistoryCommands::Delete { id: 3 }
            })
        ));
    }

    #[test]
    fn test_parse_render_with_values() {
        let cli = Cli::try_parse_from(["bible2ppt", "render", "3", "-s", "title=John", "--set", "verse=16"]).unwrap();
        let Commands::Render(args) = cli.command else {
            panic!("expected render command");
        };
        assert_eq!(args.id, 3);
        assert_eq!(args.set, vec!["title=John", "verse=16"]);
    }
}
