use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;

#[derive(Parser)]
#[command(name = "loan-wizard")]
#[command(about = "Multi-step personal loan application wizard")]
#[command(long_about = "Drives the four-step personal loan application: personal details, credit \
                       parameters, passport details and income. Step input is read from a JSON file \
                       keyed by step name.")]
pub struct Cli {
    /// Configuration file layered over the defaults
    #[arg(long, global = true, help = "Path to a loan-wizard TOML configuration file")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the wizard steps and their transitions
    Steps,
    /// Validate the values of one step and print per-field messages
    Validate {
        /// Step to validate (personal, credit, passport, income)
        #[arg(long, help = "Step name or number, e.g. 'passport' or '3'")]
        step: String,
        /// JSON file with the application input
        #[arg(long, help = "JSON object keyed by step name")]
        input: PathBuf,
    },
    /// Print the backend wire payload built from the input
    Payload {
        #[arg(long, help = "JSON object keyed by step name")]
        input: PathBuf,
    },
    /// Run the full wizard against the configured backend
    Apply {
        #[arg(long, help = "JSON object keyed by step name")]
        input: PathBuf,
    },
}
