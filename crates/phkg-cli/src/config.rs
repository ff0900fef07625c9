//! Validator configuration.
//!
//! Settings come from, in increasing precedence: defaults, an optional YAML
//! file passed with `--config`, environment variables, and command-line
//! flags. Flags are applied by the subcommand handlers.
//!
//! Environment variables:
//! - `PHKG_SCHEMA_DIR`: directory of `*.schema.json` files.
//! - `PHKG_PARALLEL`: `1`/`true` or `0`/`false`.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use phkg_validate::{DatasetOptions, UnknownKeyPolicy};

pub const ENV_SCHEMA_DIR: &str = "PHKG_SCHEMA_DIR";
pub const ENV_PARALLEL: &str = "PHKG_PARALLEL";

/// Settings shared by every subcommand.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidatorConfig {
    /// Schema directory; the built-in schema set is used when unset.
    /// Relative paths in a config file resolve against the file's directory.
    pub schema_dir: Option<PathBuf>,
    pub unknown_keys: UnknownKeyPolicy,
    pub parallel: bool,
    /// Refuse to load schemas that admit undeclared fields.
    pub require_closed_schemas: bool,
}

/// Errors from loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("invalid value for {var}: '{value}' ({reason})")]
    InvalidEnv {
        var: &'static str,
        value: String,
        reason: &'static str,
    },
}

impl ValidatorConfig {
    /// Parse a YAML config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        // An empty file deserializes as null, not as an empty mapping.
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let mut config: Self = serde_yaml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        if let (Some(dir), Some(base)) = (config.schema_dir.as_mut(), path.parent()) {
            if dir.is_relative() {
                *dir = base.join(&*dir);
            }
        }
        Ok(config)
    }

    /// Defaults or `path`, then environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env()?;
        tracing::debug!(?config, "resolved configuration");
        Ok(config)
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|var| std::env::var(var).ok())
    }

    /// Apply overrides from `lookup`, which maps a variable name to its value.
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(dir) = lookup(ENV_SCHEMA_DIR).filter(|v| !v.trim().is_empty()) {
            self.schema_dir = Some(PathBuf::from(dir));
        }
        if let Some(value) = lookup(ENV_PARALLEL) {
            self.parallel = parse_flag(ENV_PARALLEL, &value)?;
        }
        Ok(())
    }

    pub fn dataset_options(&self) -> DatasetOptions {
        DatasetOptions {
            unknown_keys: self.unknown_keys,
            parallel: self.parallel,
        }
    }
}

fn parse_flag(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" | "" => Ok(false),
        _ => Err(ConfigError::InvalidEnv {
            var,
            value: value.to_string(),
            reason: "expected 1, true, 0 or false",
        }),
    }
}
