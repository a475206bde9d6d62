use anyhow::Result;
use clap::Parser;

mod cli;

use cli::commands::{
    apply::ApplyCommand, payload::PayloadCommand, steps::StepsCommand, validate::ValidateCommand,
};
use cli::{Cli, Commands};
use loan_wizard::{init_telemetry, WizardConfig};

fn load_config(cli: &Cli) -> Result<WizardConfig> {
    match &cli.config {
        Some(path) => WizardConfig::load_from_file(path),
        None => loan_wizard::config().cloned(),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    init_telemetry(&config.observability)?;

    tokio::runtime::Runtime::new()?.block_on(async {
        match cli.command {
            Commands::Steps => StepsCommand::new().execute().await,
            Commands::Validate { step, input } => {
                ValidateCommand::new(&step, input, config)?.execute().await
            }
            Commands::Payload { input } => PayloadCommand::new(input, config).execute().await,
            Commands::Apply { input } => ApplyCommand::new(input, config).execute().await,
        }
    })
}
