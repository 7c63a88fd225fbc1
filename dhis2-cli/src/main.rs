use anyhow::Result;
use clap::Parser;

mod api;
mod cli;
mod config;
mod metadata;
mod services;
mod spreadsheet;

use cli::commands::datasets::handle_datasets_command;
use cli::commands::import::handle_import_command;
use cli::{Cli, Commands};
use config::Config;

fn init_logger(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp_secs()
        .format_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Credentials may live in a .env file next to the spreadsheet
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logger(cli.verbose);

    let config = Config::load()?;

    match cli.command {
        Commands::ImportMetadata(args) => handle_import_command(args, &config).await,
        Commands::FixSectionsDatasets(args) => handle_datasets_command(args, &config).await,
    }
}
