//! Operational errors.
//!
//! These abort the validation call that raised them. Structural and
//! referential violations are never errors; they are counted in reports.

use serde_json::Value;
use thiserror::Error;

/// A validation call could not run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The input does not have the shape the call requires.
    #[error("invalid input for {context}: expected {expected}, found {found}")]
    InvalidInput {
        /// What was being validated (`"event"`, `"dataset"`, ...).
        context: String,
        /// The required JSON type.
        expected: &'static str,
        /// The JSON type actually supplied.
        found: &'static str,
    },

    /// No schema is registered under the requested name.
    #[error("unknown schema: {0}")]
    UnknownSchema(String),
}

impl ValidationError {
    pub(crate) fn expected_array(context: &str, found: &Value) -> Self {
        Self::InvalidInput {
            context: context.to_string(),
            expected: "array",
            found: json_type_name(found),
        }
    }

    pub(crate) fn expected_object(context: &str, found: &Value) -> Self {
        Self::InvalidInput {
            context: context.to_string(),
            expected: "object",
            found: json_type_name(found),
        }
    }
}

/// JSON type name of a value, as used in error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_invalid_input_message() {
        let err = ValidationError::expected_array("event", &json!({"id": "x"}));
        assert_eq!(
            err.to_string(),
            "invalid input for event: expected array, found object"
        );
    }

    #[test]
    fn test_json_type_names() {
        assert_eq!(json_type_name(&json!(null)), "null");
        assert_eq!(json_type_name(&json!(1.5)), "number");
        assert_eq!(json_type_name(&json!([])), "array");
    }
}
