//! Formscan CLI
//!
//! Command-line front end for the form extraction pipeline.
//!
//! # Commands
//!
//! - `extract <FILE>`: run one scanned form through the pipeline
//! - `batch <FILE>...`: run several forms through the background job queue
//! - `schema <english|hebrew>`: print the empty record template
//!
//! Service credentials come from the configuration file or the
//! `AZURE_AI_SERVICES_*` / `AZURE_OPENAI_SERVICES_*` environment variables.
//!
//! # Exit Codes
//! 0 success, 1 upstream service failure, 2 input not found, 3 configuration error.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod error;

/// Formscan - Structured Extraction from Scanned Insurance Forms
#[derive(Parser)]
#[command(name = "formscan")]
#[command(version)]
#[command(about = "Extract and validate structured records from scanned work-injury forms")]
#[command(propagate_version = true)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Configuration file (default: config/default.toml and config/$FORMSCAN_ENV.toml)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract and validate a single scanned form
    ///
    /// Prints the annotated record as JSON on stdout and a short
    /// completeness summary on stderr.
    Extract(commands::extract::ExtractArgs),
    /// Extract several forms concurrently through the job queue
    ///
    /// Prints one JSON line per input file, in argument order.
    Batch(commands::batch::BatchArgs),
    /// Print the empty record template for a language
    Schema(commands::schema::SchemaArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli.config.as_deref();
    let exit_code = match cli.command {
        Commands::Extract(args) => commands::extract::handle_extract(args, config_path).await,
        Commands::Batch(args) => commands::batch::handle_batch(args, config_path).await,
        Commands::Schema(args) => commands::schema::handle_schema(args),
    };

    std::process::exit(exit_code.into());
}
