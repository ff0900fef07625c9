//! # Schemas Subcommand
//!
//! Lists the schemas the validator would load and, with `--audit`, checks
//! each one against the closed-world policy.

use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use phkg_schema::audit_closed_world;

use crate::config::ValidatorConfig;
use crate::{load_registry, EXIT_FAILURE, EXIT_SUCCESS};

/// Arguments for the `phkg schemas` subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct SchemasArgs {
    /// Report object schemas that admit undeclared fields.
    #[arg(long)]
    pub audit: bool,

    /// Directory of `*.schema.json` files (overrides config and environment).
    #[arg(long, value_name = "DIR")]
    pub schema_dir: Option<PathBuf>,
}

/// Execute the schemas subcommand.
///
/// Returns exit code: 0, or 1 when the audit finds an open schema.
pub fn run_schemas(args: &SchemasArgs, config: &ValidatorConfig) -> Result<u8> {
    let (code, text) = describe_schemas(args, config)?;
    print!("{text}");
    Ok(code)
}

/// Render the listing and audit without printing.
pub fn describe_schemas(args: &SchemasArgs, config: &ValidatorConfig) -> Result<(u8, String)> {
    let mut config = config.clone();
    if let Some(dir) = &args.schema_dir {
        config.schema_dir = Some(dir.clone());
    }
    // The audit reports open schemas itself instead of refusing to load them.
    if args.audit {
        config.require_closed_schemas = false;
    }
    let registry = load_registry(&config).context("failed to load schemas")?;

    let mut out = String::new();
    let _ = writeln!(out, "Schemas ({}): {}", registry.source(), registry.len());
    for definition in registry.definitions() {
        let _ = writeln!(
            out,
            "  {}: {} required, {} declared fields, {}",
            definition.name(),
            definition.required_fields().len(),
            definition.declared_fields().len(),
            if definition.is_closed() { "closed" } else { "open" },
        );
    }
    for (name, _) in registry.shared_documents() {
        let _ = writeln!(out, "  {name}: shared definitions");
    }

    if !args.audit {
        return Ok((EXIT_SUCCESS, out));
    }

    let findings: Vec<_> = registry
        .definitions()
        .map(|d| (d.name(), d.document()))
        .chain(registry.shared_documents())
        .flat_map(|(name, document)| audit_closed_world(name, document))
        .collect();
    if findings.is_empty() {
        let _ = writeln!(out, "Audit: all object schemas are closed");
        return Ok((EXIT_SUCCESS, out));
    }

    let _ = writeln!(out, "Audit: {} open object schema(s)", findings.len());
    for finding in &findings {
        tracing::warn!(schema = %finding.schema_name, path = %finding.path, "open object schema");
        let _ = writeln!(out, "  {finding}");
    }
    Ok((EXIT_FAILURE, out))
}
