//! # Validate Subcommand
//!
//! Validates a data file either as a whole dataset (no schema argument) or
//! against one named schema.
//!
//! In single-schema mode an array is validated as a collection and any other
//! value as a collection of one. Relationships validated this way are only
//! checked structurally; endpoint resolution needs the full dataset.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;

use phkg_schema::SchemaRegistry;
use phkg_validate::{
    render_collection, render_dataset, CollectionValidator, DatasetValidator, Verbosity,
};

use crate::config::ValidatorConfig;
use crate::document::load_document;
use crate::{load_registry, OutputFormat, EXIT_FAILURE, EXIT_OPERATIONAL, EXIT_SUCCESS};

/// Arguments for the `phkg validate` subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct ValidateArgs {
    /// Data file to validate (JSON, or YAML for `.yaml`/`.yml`).
    #[arg(value_name = "DATA_FILE")]
    pub data_file: PathBuf,

    /// Validate against this schema instead of as a full dataset.
    #[arg(value_name = "SCHEMA")]
    pub schema: Option<String>,

    /// Print every error of every invalid item.
    #[arg(short, long)]
    pub verbose: bool,

    /// Report format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Directory of `*.schema.json` files (overrides config and environment).
    #[arg(long, value_name = "DIR")]
    pub schema_dir: Option<PathBuf>,

    /// Validate entity collections in parallel.
    #[arg(long)]
    pub parallel: bool,
}

/// Rendered report and the exit code it implies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidateOutcome {
    pub exit_code: u8,
    /// Report text for stdout; empty when the data file could not be loaded.
    pub report: String,
    /// Message for stderr, if any.
    pub diagnostic: Option<String>,
}

/// Execute the validate subcommand.
///
/// Returns exit code: 0 on success, 1 on validation failure, 2 when the data
/// file cannot be read or parsed. Other operational failures are returned
/// as errors.
pub fn run_validate(args: &ValidateArgs, config: &ValidatorConfig) -> Result<u8> {
    let outcome = execute_validate(args, config)?;
    if !outcome.report.is_empty() {
        print!("{}", outcome.report);
    }
    if let Some(diagnostic) = &outcome.diagnostic {
        eprintln!("{diagnostic}");
    }
    Ok(outcome.exit_code)
}

/// Validate without printing.
pub fn execute_validate(args: &ValidateArgs, config: &ValidatorConfig) -> Result<ValidateOutcome> {
    let config = effective_config(args, config);
    let registry = load_registry(&config).context("failed to load schemas")?;

    let document = match load_document(&args.data_file) {
        Ok(document) => document,
        Err(e) => {
            return Ok(ValidateOutcome {
                exit_code: EXIT_OPERATIONAL,
                report: String::new(),
                diagnostic: Some(format!("Error reading or parsing file: {e}")),
            });
        }
    };

    let verbosity = Verbosity::from_verbose_flag(args.verbose);
    let (success, report) = match &args.schema {
        Some(schema) => validate_against_schema(&registry, &document, schema, args.format, verbosity)?,
        None => {
            let report = DatasetValidator::with_options(&registry, config.dataset_options())
                .validate_dataset(&document)
                .with_context(|| format!("cannot validate {} as a dataset", args.data_file.display()))?;
            let text = match args.format {
                OutputFormat::Text => render_dataset(&report, verbosity),
                OutputFormat::Json => to_json(&report)?,
            };
            (report.success, text)
        }
    };

    Ok(ValidateOutcome {
        exit_code: if success { EXIT_SUCCESS } else { EXIT_FAILURE },
        report,
        diagnostic: None,
    })
}

/// Command-line flags take precedence over the loaded configuration.
fn effective_config(args: &ValidateArgs, config: &ValidatorConfig) -> ValidatorConfig {
    let mut config = config.clone();
    if let Some(dir) = &args.schema_dir {
        config.schema_dir = Some(dir.clone());
    }
    if args.parallel {
        config.parallel = true;
    }
    config
}

fn validate_against_schema(
    registry: &SchemaRegistry,
    document: &Value,
    schema: &str,
    format: OutputFormat,
    verbosity: Verbosity,
) -> Result<(bool, String)> {
    let validator = CollectionValidator::new(registry);
    let report = match document {
        Value::Array(items) => validator.validate_items(items, schema),
        single => validator.validate_items(std::slice::from_ref(single), schema),
    }
    .with_context(|| format!("cannot validate against schema '{schema}'"))?;

    let text = match format {
        OutputFormat::Text => render_collection(&report, verbosity),
        OutputFormat::Json => to_json(&report)?,
    };
    Ok((report.is_success(), text))
}

fn to_json<T: serde::Serialize>(report: &T) -> Result<String> {
    let mut text = serde_json::to_string_pretty(report).context("failed to serialize report")?;
    text.push('\n');
    Ok(text)
}
