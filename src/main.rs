//! Bible2PPT CLI entry point.

use anyhow::Result;
use clap::Parser;

use bible2ppt::cli::commands::{bible, build, history, init, serve, template};
use bible2ppt::cli::{handle_error, Cli, Commands};
use bible2ppt::domain::models::Config;
use bible2ppt::infrastructure::config::ConfigLoader;
use bible2ppt::infrastructure::logging::LoggerImpl;

fn load_config(cli: &Cli) -> Result<Config> {
    match &cli.config {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(),
    }
}

async fn run(cli: Cli) -> Result<()> {
    // init runs before any configuration exists
    if let Commands::Init(args) = cli.command {
        return init::execute(args, cli.json).await;
    }

    let config = load_config(&cli)?;
    let _logger = LoggerImpl::init(&config.logging)?;

    match cli.command {
        Commands::Init(_) => Ok(()),
        Commands::Serve(args) => serve::execute(args, &config).await,
        Commands::Bibles(args) => bible::list_bibles(args, &config, cli.json).await,
        Commands::Books(args) => bible::list_books(args, &config, cli.json).await,
        Commands::ClearCache => bible::clear_cache(&config, cli.json).await,
        Commands::Template(args) => template::execute(args, &config, cli.json).await,
        Commands::Render(args) => template::render(args, &config, cli.json).await,
        Commands::Build(args) => build::execute(args, &config, cli.json).await,
        Commands::History(args) => history::execute(args, &config, cli.json).await,
        Commands::Parse(args) => bible::parse(args, &config, cli.json).await,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let json_mode = cli.json;

    if let Err(err) = run(cli).await {
        handle_error(err, json_mode);
    }
}
