//! Data file loading.
//!
//! Files ending in `.yaml` or `.yml` are parsed as YAML straight into the
//! JSON value model; everything else is parsed as JSON. YAML mapping keys
//! that are numbers or booleans become strings.

use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

/// A data file could not be read or parsed.
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("{path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{path}: invalid JSON: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("{path}: invalid YAML: {source}")]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}

/// Whether `path` names a YAML file.
pub fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
}

/// Read and decode a data file.
pub fn load_document(path: &Path) -> Result<Value, DocumentError> {
    let text = std::fs::read_to_string(path).map_err(|source| DocumentError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    if is_yaml(path) {
        serde_yaml::from_str(&text).map_err(|source| DocumentError::Yaml {
            path: path.to_path_buf(),
            source,
        })
    } else {
        serde_json::from_str(&text).map_err(|source| DocumentError::Json {
            path: path.to_path_buf(),
            source,
        })
    }
}
