//! Collection validation: one schema, many items, no fail-fast.

use serde_json::Value;

use phkg_core::HasIdentifier;
use phkg_schema::SchemaRegistry;

use crate::entity::EntityValidator;
use crate::error::ValidationError;
use crate::report::CollectionReport;

/// Validates ordered sequences of items against one schema.
#[derive(Debug, Clone, Copy)]
pub struct CollectionValidator<'r> {
    entities: EntityValidator<'r>,
}

impl<'r> CollectionValidator<'r> {
    pub fn new(registry: &'r SchemaRegistry) -> Self {
        Self {
            entities: EntityValidator::new(registry),
        }
    }

    /// Validate every element of `items` against `schema_name`.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::InvalidInput`] if `items` is not an array.
    /// - [`ValidationError::UnknownSchema`] if `schema_name` is not registered.
    ///
    /// Both are raised before any item is examined.
    pub fn validate_all(
        &self,
        items: &Value,
        schema_name: &str,
    ) -> Result<CollectionReport, ValidationError> {
        let items = items
            .as_array()
            .ok_or_else(|| ValidationError::expected_array(schema_name, items))?;
        self.validate_items(items, schema_name)
    }

    /// Validate a slice of items against `schema_name`.
    ///
    /// # Errors
    ///
    /// [`ValidationError::UnknownSchema`] if `schema_name` is not registered.
    pub fn validate_items(
        &self,
        items: &[Value],
        schema_name: &str,
    ) -> Result<CollectionReport, ValidationError> {
        if !self.entities.registry().contains(schema_name) {
            return Err(ValidationError::UnknownSchema(schema_name.to_string()));
        }

        let mut report = CollectionReport::new(schema_name);
        for item in items {
            report.push(item.identifier(), self.entities.validate(item, schema_name));
        }

        tracing::info!(
            schema = schema_name,
            total = report.total,
            valid = report.valid,
            invalid = report.invalid,
            "validated collection"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn actor(id: &str, name: &str) -> Value {
        json!({"id": id, "name": name, "type": "Institution"})
    }

    #[test]
    fn test_counts_sum_to_length_and_order_is_kept() {
        let registry = SchemaRegistry::builtin().unwrap();
        let items = json!([
            actor("6ba7b810-9dad-11d1-80b4-00c04fd430c8", "WHO"),
            {"name": "No Id", "type": "NGO"},
            actor("6ba7b811-9dad-11d1-80b4-00c04fd430c8", ""),
            actor("6ba7b812-9dad-11d1-80b4-00c04fd430c8", "Wellcome Trust"),
        ]);

        let report = CollectionValidator::new(&registry)
            .validate_all(&items, "actor")
            .unwrap();

        assert_eq!(report.total, 4);
        assert_eq!(report.valid + report.invalid, report.total);
        assert_eq!(report.invalid, 2);
        let labels: Vec<(usize, &str)> = report
            .failures
            .iter()
            .map(|f| (f.index, f.id.as_str()))
            .collect();
        assert_eq!(
            labels,
            vec![(1, "item[1]"), (2, "6ba7b811-9dad-11d1-80b4-00c04fd430c8")]
        );
    }

    #[test]
    fn test_empty_collection_is_success() {
        let registry = SchemaRegistry::builtin().unwrap();
        let report = CollectionValidator::new(&registry)
            .validate_all(&json!([]), "concept")
            .unwrap();
        assert_eq!(report.total, 0);
        assert!(report.is_success());
    }

    #[test]
    fn test_non_array_input_is_rejected() {
        let registry = SchemaRegistry::builtin().unwrap();
        let err = CollectionValidator::new(&registry)
            .validate_all(&actor("6ba7b810-9dad-11d1-80b4-00c04fd430c8", "WHO"), "actor")
            .unwrap_err();
        assert!(matches!(
            err,
            ValidationError::InvalidInput { expected: "array", found: "object", .. }
        ));
    }

    #[test]
    fn test_unknown_schema_is_operational_error() {
        let registry = SchemaRegistry::builtin().unwrap();
        let err = CollectionValidator::new(&registry)
            .validate_all(&json!([]), "organization")
            .unwrap_err();
        assert_eq!(err, ValidationError::UnknownSchema("organization".into()));
    }
}
