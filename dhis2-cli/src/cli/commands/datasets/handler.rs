//! Data set section fix-up command handler

use anyhow::{Context, Result};
use colored::*;

use super::DataSetsCommands;
use crate::api::Dhis2Client;
use crate::config::Config;
use crate::services::datasets::{DataSetD2Repository, FixDataSetSectionsUseCase};

pub async fn handle_datasets_command(args: DataSetsCommands, config: &Config) -> Result<()> {
    let client = Dhis2Client::new(&args.url).context("Invalid server URL")?;
    log::info!("Server: {}", client.base_url());

    let repository = DataSetD2Repository::new(client, config.section_chunk_size);
    let fixed = FixDataSetSectionsUseCase::new(repository).execute().await?;

    if fixed == 0 {
        println!("{}", "No sections to fix".yellow());
    } else {
        println!(
            "{} Fixed {} sections",
            "✓".bright_green().bold(),
            fixed.to_string().cyan()
        );
    }

    Ok(())
}
