//! # Validation Verdicts
//!
//! Structural and referential checks both report [`FieldError`]s. A single
//! item's verdict is a [`ValidationResult`]: either valid, or invalid with
//! the complete list of violations found in one pass.

use serde::Serialize;
use serde_json::{Map, Value};

/// A single violation with structured context.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    /// JSON Pointer to the violating field within the item (empty for the root).
    pub path: String,
    /// Human-readable description of the violation.
    pub message: String,
    /// The constraint that failed (`required`, `enum`, `reference`, ...).
    pub keyword: String,
    /// Machine-readable details: expected values, offending value, ids.
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub params: Map<String, Value>,
}

impl FieldError {
    /// Create an error with no parameters.
    pub fn new(
        path: impl Into<String>,
        keyword: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            keyword: keyword.into(),
            params: Map::new(),
        }
    }

    /// Attach a machine-readable parameter.
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// JSON Pointer for a top-level field, escaping `~` and `/`.
    pub fn pointer_for(field: &str) -> String {
        format!("/{}", field.replace('~', "~0").replace('/', "~1"))
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.path.is_empty() {
            write!(f, "(root): {}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

/// The verdict for one entity or relationship.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ValidationResult {
    /// Every check passed.
    Valid,
    /// One or more checks failed.
    Invalid {
        /// Every violation found, in check order.
        errors: Vec<FieldError>,
    },
}

impl ValidationResult {
    /// `Valid` when `errors` is empty, `Invalid` otherwise.
    pub fn from_errors(errors: Vec<FieldError>) -> Self {
        if errors.is_empty() {
            Self::Valid
        } else {
            Self::Invalid { errors }
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// The violations; empty for a valid result.
    pub fn errors(&self) -> &[FieldError] {
        match self {
            Self::Valid => &[],
            Self::Invalid { errors } => errors,
        }
    }

    pub fn into_errors(self) -> Vec<FieldError> {
        match self {
            Self::Valid => Vec::new(),
            Self::Invalid { errors } => errors,
        }
    }
}
