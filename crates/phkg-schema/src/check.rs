//! Maps schema-engine violations onto [`FieldError`]s.
//!
//! Two violation kinds are reshaped so that paths always name the field
//! involved: a missing required property is reported at `/<property>`, and
//! an `additionalProperties` violation is split into one error per
//! unexpected key at `/<key>`.

use jsonschema::error::ValidationErrorKind;
use jsonschema::Validator;
use serde_json::Value;

use phkg_core::FieldError;

pub(crate) fn collect_field_errors(validator: &Validator, instance: &Value) -> Vec<FieldError> {
    let mut errors = Vec::new();

    for error in validator.iter_errors(instance) {
        let path = error.instance_path.to_string();

        match &error.kind {
            ValidationErrorKind::Required { property } => {
                let field = property
                    .as_str()
                    .map(str::to_owned)
                    .unwrap_or_else(|| property.to_string());
                errors.push(
                    FieldError::new(
                        format!("{path}{}", FieldError::pointer_for(&field)),
                        "required",
                        format!("Missing required field '{field}'"),
                    )
                    .with_param("missingProperty", field),
                );
            }
            ValidationErrorKind::AdditionalProperties { unexpected } => {
                for field in unexpected {
                    errors.push(
                        FieldError::new(
                            format!("{path}{}", FieldError::pointer_for(field)),
                            "additionalProperties",
                            format!("Unexpected field '{field}' is not declared in the schema"),
                        )
                        .with_param("additionalProperty", field.clone()),
                    );
                }
            }
            ValidationErrorKind::Enum { options } => {
                errors.push(
                    FieldError::new(path, "enum", error.to_string())
                        .with_param("allowedValues", options.clone())
                        .with_param("value", Value::clone(&error.instance)),
                );
            }
            _ => {
                let keyword = keyword_of(&error.schema_path.to_string());
                let mut field_error = FieldError::new(path, keyword, error.to_string());
                if !error.instance.is_object() && !error.instance.is_array() {
                    field_error = field_error.with_param("value", Value::clone(&error.instance));
                }
                errors.push(field_error);
            }
        }
    }

    errors
}

/// The failed keyword is the last segment of the schema path
/// (`/properties/year/$ref/maximum` -> `maximum`).
fn keyword_of(schema_path: &str) -> String {
    match schema_path.rsplit('/').next() {
        Some(segment) if !segment.is_empty() => segment.to_string(),
        _ => "schema".to_string(),
    }
}
