pub mod cli;
pub mod core;
pub mod providers;

use crate::core::config::AppConfig;
use anyhow::Result;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    Update,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Euribor updater starting...");

    let config = AppConfig::load(config_path)?;
    debug!("Loaded config: {config:#?}");

    match command {
        AppCommand::Update => {
            let provider =
                providers::EcbProvider::new(&config.providers.ecb, &config.start_period)?;
            cli::update::run(&config, &provider).await?;
        }
    }
    Ok(())
}
