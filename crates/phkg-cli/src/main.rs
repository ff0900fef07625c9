//! # phkg CLI entry point
//!
//! Parses command-line arguments, installs logging, loads configuration and
//! dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use phkg_cli::config::ValidatorConfig;
use phkg_cli::schemas::{run_schemas, SchemasArgs};
use phkg_cli::validate::{run_validate, ValidateArgs};
use phkg_cli::EXIT_OPERATIONAL;

/// Planetary health knowledge graph validator.
///
/// Checks entity and relationship data against the knowledge graph schemas
/// and verifies that every relationship endpoint exists.
#[derive(Parser, Debug)]
#[command(name = "phkg", version, about, long_about = None)]
struct Cli {
    /// Log filter (error, warn, info, debug, trace). `RUST_LOG` takes precedence.
    #[arg(long, global = true, default_value = "warn", value_name = "LEVEL")]
    log_level: String,

    /// Path to a YAML configuration file.
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a dataset, or a file of items against one schema.
    Validate(ValidateArgs),

    /// List the loaded schemas and optionally audit them.
    Schemas(SchemasArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "phkg starting");

    let config = match ValidatorConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(EXIT_OPERATIONAL);
        }
    };

    let result = match cli.command {
        Commands::Validate(args) => run_validate(&args, &config),
        Commands::Schemas(args) => run_schemas(&args, &config),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(EXIT_OPERATIONAL)
        }
    }
}
