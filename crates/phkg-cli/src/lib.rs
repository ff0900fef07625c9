//! # phkg-cli — Knowledge Graph Validator CLI
//!
//! Provides the `phkg` command-line interface.
//!
//! ## Subcommands
//!
//! - `phkg validate <DATA_FILE> [SCHEMA]`: validate a whole dataset, or a
//!   file of items against one named schema.
//! - `phkg schemas`: list the loaded schemas, optionally auditing them for
//!   the closed-world policy.
//!
//! ```bash
//! phkg validate data/knowledge_graph.json --verbose
//! phkg validate data/actors.yaml actor
//! phkg schemas --audit --schema-dir schemas/
//! ```
//!
//! ## Exit Codes
//!
//! `0` success, `1` validation failure or audit finding, `2` operational
//! failure (unreadable file, unknown schema, bad configuration).

pub mod config;
pub mod document;
pub mod schemas;
pub mod validate;

use phkg_schema::{RegistryError, SchemaRegistry};

use crate::config::ValidatorConfig;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_OPERATIONAL: u8 = 2;

/// Output format for reports.
#[derive(clap::ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Build the schema registry `config` points at.
///
/// Uses the schema directory when one is configured and the built-in
/// schema set otherwise.
pub fn load_registry(config: &ValidatorConfig) -> Result<SchemaRegistry, RegistryError> {
    let mut builder = SchemaRegistry::builder();
    match &config.schema_dir {
        Some(dir) => builder.register_dir(dir)?,
        None => builder.register_builtin()?,
    };
    builder.require_closed(config.require_closed_schemas);
    let registry = builder.build()?;

    tracing::info!(
        source = %registry.source(),
        schema_count = registry.len(),
        "loaded schema registry"
    );
    Ok(registry)
}
