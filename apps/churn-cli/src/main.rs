//! churn - USSD customer churn prediction and analytics CLI
//!
//! Scores customer records against the trained random-forest model and
//! prints descriptive analytics over the historical dataset.

mod commands;
mod config;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::CliError;
use config::AppConfig;

#[derive(Parser, Debug)]
#[command(name = "churn", version, about = "USSD customer churn prediction")]
struct Cli {
    /// Path to a config file (overrides CHURN_CONFIG and the per-user file)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score one customer record
    Predict(PredictArgs),

    /// Print the analytics report over the historical dataset
    Report,

    /// Show the first rows of the dataset
    Sample(SampleArgs),

    /// Write a copy of the dataset as CSV
    Export(ExportArgs),
}

/// Arguments for the predict command
#[derive(Parser, Debug)]
struct PredictArgs {
    /// JSON file holding the customer record
    #[arg(short, long)]
    input: PathBuf,

    /// Also print the model's feature importance ranking
    #[arg(long)]
    importance: bool,
}

/// Arguments for the sample command
#[derive(Parser, Debug)]
struct SampleArgs {
    /// Number of rows to show
    #[arg(long, default_value_t = 20)]
    rows: usize,
}

/// Arguments for the export command
#[derive(Parser, Debug)]
struct ExportArgs {
    /// Destination CSV path
    #[arg(short, long)]
    output: PathBuf,
}

fn main() {
    // Setup logging
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = AppConfig::resolve(cli.config.as_deref())?;

    match cli.command {
        Command::Predict(args) => commands::predict(&config, &args.input, args.importance),
        Command::Report => commands::report(&config),
        Command::Sample(args) => commands::sample(&config, args.rows),
        Command::Export(args) => commands::export(&config, &args.output),
    }
}
