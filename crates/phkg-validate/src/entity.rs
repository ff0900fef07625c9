//! Single-entity structural validation.

use serde_json::Value;

use phkg_core::{FieldError, ValidationResult};
use phkg_schema::SchemaRegistry;

/// Validates one instance against a named schema.
///
/// Every applicable constraint is checked; the result carries the complete
/// list of violations rather than the first one found.
#[derive(Debug, Clone, Copy)]
pub struct EntityValidator<'r> {
    registry: &'r SchemaRegistry,
}

impl<'r> EntityValidator<'r> {
    pub fn new(registry: &'r SchemaRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'r SchemaRegistry {
        self.registry
    }

    /// Validate `entity` against the schema registered as `schema_name`.
    ///
    /// An unknown schema name is reported inside the result, as a single
    /// `schema` error at the root, so batch callers can keep going.
    pub fn validate(&self, entity: &Value, schema_name: &str) -> ValidationResult {
        match self.registry.resolve(schema_name) {
            Ok(definition) => ValidationResult::from_errors(definition.check(entity)),
            Err(_) => ValidationResult::from_errors(vec![FieldError::new(
                "",
                "schema",
                format!("Unknown schema '{schema_name}'"),
            )
            .with_param("schema", schema_name)]),
        }
    }
}
