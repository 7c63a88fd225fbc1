//! Metadata import command handler

use anyhow::{Context, Result};
use colored::*;

use super::ImportCommands;
use crate::api::Dhis2Client;
use crate::config::Config;
use crate::metadata::MetadataImportOptions;
use crate::services::import::{ImportMetadataUseCase, MetadataD2Repository};
use crate::spreadsheet::SpreadsheetImportRepository;

pub async fn handle_import_command(args: ImportCommands, config: &Config) -> Result<()> {
    if !args.input_file.exists() {
        anyhow::bail!("Input file does not exist: {}", args.input_file.display());
    }

    let client = Dhis2Client::new(&args.url).context("Invalid server URL")?;
    log::info!("Server: {}", client.base_url());

    let use_case = ImportMetadataUseCase::new(
        SpreadsheetImportRepository::new(),
        MetadataD2Repository::new(client, &config.payload_path),
    );

    use_case
        .execute(&MetadataImportOptions::new(&args.input_file))
        .await?;

    println!(
        "{} Metadata imported from {} (payload: {})",
        "✓".bright_green().bold(),
        args.input_file.display().to_string().cyan(),
        config.payload_path.display().to_string().dimmed()
    );

    Ok(())
}
