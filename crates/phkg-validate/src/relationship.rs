//! # Relationship Validation
//!
//! Relationships are checked in two passes over the same report:
//!
//! 1. **Structural.** Every relationship is validated against the
//!    `relationship` schema.
//! 2. **Referential.** Each endpoint is resolved in the [`EntityIndex`]. A
//!    dangling endpoint appends a `reference` error at `/source_id` or
//!    `/target_id` and flips the item to invalid if it was valid.
//!
//! A relationship missing any of `source_id`, `source_type`, `target_id` or
//! `target_type` (or carrying a non-string or empty value there) is reported
//! with its structural errors only; its endpoints cannot be resolved.
//! Self-references are accepted as long as the entity exists.

use serde_json::Value;

use phkg_core::{FieldError, HasIdentifier, RELATIONSHIP_SCHEMA};
use phkg_schema::SchemaRegistry;

use crate::collection::CollectionValidator;
use crate::error::ValidationError;
use crate::index::EntityIndex;
use crate::report::CollectionReport;

/// The four endpoint fields of one relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Endpoints<'a> {
    source_id: &'a str,
    source_type: &'a str,
    target_id: &'a str,
    target_type: &'a str,
}

impl<'a> Endpoints<'a> {
    fn of(relationship: &'a Value) -> Option<Self> {
        let field = |name: &str| {
            relationship
                .get(name)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
        };
        Some(Self {
            source_id: field("source_id")?,
            source_type: field("source_type")?,
            target_id: field("target_id")?,
            target_type: field("target_type")?,
        })
    }
}

/// Structural plus referential validation of relationships.
#[derive(Debug, Clone, Copy)]
pub struct RelationshipValidator<'r> {
    collections: CollectionValidator<'r>,
}

impl<'r> RelationshipValidator<'r> {
    pub fn new(registry: &'r SchemaRegistry) -> Self {
        Self {
            collections: CollectionValidator::new(registry),
        }
    }

    /// Validate a relationship array against the schema and `index`.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::InvalidInput`] if `relationships` is not an array.
    /// - [`ValidationError::UnknownSchema`] if no `relationship` schema is
    ///   registered.
    pub fn validate_relationships(
        &self,
        relationships: &Value,
        index: &EntityIndex<'_>,
    ) -> Result<CollectionReport, ValidationError> {
        let items = relationships
            .as_array()
            .ok_or_else(|| ValidationError::expected_array(RELATIONSHIP_SCHEMA, relationships))?;
        self.validate_items(items, index)
    }

    /// Validate a slice of relationships.
    ///
    /// # Errors
    ///
    /// [`ValidationError::UnknownSchema`] if no `relationship` schema is
    /// registered.
    pub fn validate_items(
        &self,
        relationships: &[Value],
        index: &EntityIndex<'_>,
    ) -> Result<CollectionReport, ValidationError> {
        let mut report = self
            .collections
            .validate_items(relationships, RELATIONSHIP_SCHEMA)?;

        let mut dangling = 0usize;
        for (position, relationship) in relationships.iter().enumerate() {
            let errors = reference_errors(relationship, index);
            if errors.is_empty() {
                continue;
            }
            dangling += errors.len();
            report.record_errors(position, relationship.identifier(), errors);
        }

        tracing::debug!(
            total = report.total,
            invalid = report.invalid,
            dangling,
            "resolved relationship endpoints"
        );
        Ok(report)
    }
}

/// Referential errors for one relationship, source before target.
fn reference_errors(relationship: &Value, index: &EntityIndex<'_>) -> Vec<FieldError> {
    let Some(ends) = Endpoints::of(relationship) else {
        return Vec::new();
    };

    let mut errors = Vec::new();
    let source = index.resolve(ends.source_type, ends.source_id);
    let target = index.resolve(ends.target_type, ends.target_id);
    if source.is_none() {
        errors.push(dangling("/source_id", "Source", ends.source_id, ends.source_type));
    }
    if target.is_none() {
        errors.push(dangling("/target_id", "Target", ends.target_id, ends.target_type));
    }
    if let (Some(source), Some(target)) = (source, target) {
        tracing::trace!(
            source = source.display_name().unwrap_or(ends.source_id),
            target = target.display_name().unwrap_or(ends.target_id),
            "resolved relationship"
        );
    }
    errors
}

fn dangling(path: &str, side: &str, id: &str, declared_type: &str) -> FieldError {
    FieldError::new(
        path,
        "reference",
        format!("{side} entity '{id}' of type '{declared_type}' not found"),
    )
    .with_param("id", id)
    .with_param("type", declared_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use phkg_core::EntityKind;
    use serde_json::json;

    const EVENT_ID: &str = "9b2f0c7e-4d1a-4f6b-8a3e-2c5d7e9f1a2b";
    const ACTOR_ID: &str = "3e1c5a7b-9d2f-4b8e-a6c4-1f3d5b7a9c0e";
    const MISSING_ID: &str = "00000000-0000-4000-8000-000000000000";

    fn relationship(id: &str, source: &str, target: &str, target_type: &str) -> Value {
        json!({
            "id": id,
            "source_id": source,
            "source_type": "Event",
            "target_id": target,
            "target_type": target_type,
            "relationship_type": "Participates"
        })
    }

    fn fixtures() -> (Value, Value) {
        (
            json!({"id": EVENT_ID, "title": "Planetary Health Annual Meeting", "year": 2017,
                   "description": "First annual meeting.", "type": "Conference"}),
            json!({"id": ACTOR_ID, "name": "Planetary Health Alliance", "type": "Coalition"}),
        )
    }

    #[test]
    fn test_resolving_endpoints_are_valid() {
        let registry = SchemaRegistry::builtin().unwrap();
        let (event, actor) = fixtures();
        let mut index = EntityIndex::new();
        index.insert(EntityKind::Event, 0, &event);
        index.insert(EntityKind::Actor, 0, &actor);

        let rels = json!([relationship(
            "5c9e1b3d-7f2a-4c6e-b8d0-2a4c6e8f0b1d",
            EVENT_ID,
            ACTOR_ID,
            "actor"
        )]);
        let report = RelationshipValidator::new(&registry)
            .validate_relationships(&rels, &index)
            .unwrap();
        assert!(report.is_success(), "{:?}", report.failures);
    }

    #[test]
    fn test_dangling_target_flips_structurally_valid_item() {
        let registry = SchemaRegistry::builtin().unwrap();
        let (event, _) = fixtures();
        let mut index = EntityIndex::new();
        index.insert(EntityKind::Event, 0, &event);

        let rels = json!([relationship(
            "5c9e1b3d-7f2a-4c6e-b8d0-2a4c6e8f0b1d",
            EVENT_ID,
            MISSING_ID,
            "Actor"
        )]);
        let report = RelationshipValidator::new(&registry)
            .validate_relationships(&rels, &index)
            .unwrap();

        assert_eq!((report.valid, report.invalid), (0, 1));
        let errors = &report.failures[0].errors;
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path, "/target_id");
        assert_eq!(errors[0].keyword, "reference");
        assert_eq!(
            errors[0].message,
            format!("Target entity '{MISSING_ID}' of type 'Actor' not found")
        );
        assert_eq!(errors[0].params["id"], MISSING_ID);
    }

    #[test]
    fn test_wrong_declared_type_does_not_resolve() {
        let registry = SchemaRegistry::builtin().unwrap();
        let (event, actor) = fixtures();
        let mut index = EntityIndex::new();
        index.insert(EntityKind::Event, 0, &event);
        index.insert(EntityKind::Actor, 0, &actor);

        let rels = json!([relationship(
            "5c9e1b3d-7f2a-4c6e-b8d0-2a4c6e8f0b1d",
            EVENT_ID,
            ACTOR_ID,
            "Location"
        )]);
        let report = RelationshipValidator::new(&registry)
            .validate_relationships(&rels, &index)
            .unwrap();
        assert_eq!(report.invalid, 1);
        assert_eq!(report.failures[0].errors[0].params["type"], "Location");
    }

    #[test]
    fn test_structural_and_referential_errors_coexist() {
        let registry = SchemaRegistry::builtin().unwrap();
        let index = EntityIndex::new();
        let mut rel = relationship("5c9e1b3d-7f2a-4c6e-b8d0-2a4c6e8f0b1d", EVENT_ID, ACTOR_ID, "Actor");
        rel["strength"] = json!(11);

        let report = RelationshipValidator::new(&registry)
            .validate_relationships(&json!([rel]), &index)
            .unwrap();

        assert_eq!((report.valid, report.invalid), (0, 1));
        let paths: Vec<&str> = report.failures[0].errors.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["/strength", "/source_id", "/target_id"]);
    }

    #[test]
    fn test_missing_endpoint_field_reports_structural_errors_only() {
        let registry = SchemaRegistry::builtin().unwrap();
        let index = EntityIndex::new();
        let mut rel = relationship("5c9e1b3d-7f2a-4c6e-b8d0-2a4c6e8f0b1d", EVENT_ID, MISSING_ID, "Actor");
        rel.as_object_mut().unwrap().remove("target_type");

        let report = RelationshipValidator::new(&registry)
            .validate_relationships(&json!([rel]), &index)
            .unwrap();

        let errors = &report.failures[0].errors;
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path, "/target_type");
        assert_eq!(errors[0].keyword, "required");
    }

    #[test]
    fn test_self_reference_is_accepted() {
        let registry = SchemaRegistry::builtin().unwrap();
        let (event, _) = fixtures();
        let mut index = EntityIndex::new();
        index.insert(EntityKind::Event, 0, &event);

        let mut rel = relationship("5c9e1b3d-7f2a-4c6e-b8d0-2a4c6e8f0b1d", EVENT_ID, EVENT_ID, "Event");
        rel["relationship_type"] = json!("Influences");
        let report = RelationshipValidator::new(&registry)
            .validate_relationships(&json!([rel]), &index)
            .unwrap();
        assert!(report.is_success());
    }

    #[test]
    fn test_non_array_input_is_rejected() {
        let registry = SchemaRegistry::builtin().unwrap();
        let err = RelationshipValidator::new(&registry)
            .validate_relationships(&json!({"id": "r"}), &EntityIndex::new())
            .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidInput { .. }));
    }
}
