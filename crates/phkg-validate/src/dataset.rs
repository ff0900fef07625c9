//! # Dataset Validation
//!
//! Orchestrates one validation pass over a whole dataset document:
//!
//! 1. Entity collections are validated structurally, in kind order
//!    (Event, Actor, Location, Concept, Publication). With
//!    [`DatasetOptions::parallel`] the collections are validated on the
//!    rayon pool; results are identical to the sequential path.
//! 2. The [`EntityIndex`] is built from every entity that carries a usable
//!    `id`, valid or not. A repeated id within one kind is a `unique` error
//!    on the later entity.
//! 3. Relationships are validated against the complete index. A present
//!    `relationships` key that is not an array is an operational error,
//!    unlike an entity collection key, which is skipped.
//!
//! Top-level keys that name neither an entity collection nor `relationships`
//! are never validated or indexed. They are listed in
//! [`DatasetReport::ignored_keys`] and never affect success.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use phkg_core::{EntityKind, FieldError, HasIdentifier, RELATIONSHIP_COLLECTION};
use phkg_schema::SchemaRegistry;

use crate::collection::CollectionValidator;
use crate::error::ValidationError;
use crate::index::EntityIndex;
use crate::relationship::RelationshipValidator;
use crate::report::{CollectionReport, DatasetReport};

/// What to do with unrecognized top-level dataset keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownKeyPolicy {
    /// Record the key silently.
    Ignore,
    /// Record the key and log a warning.
    #[default]
    Warn,
}

/// Tuning knobs for a dataset pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DatasetOptions {
    pub unknown_keys: UnknownKeyPolicy,
    /// Validate entity collections concurrently.
    pub parallel: bool,
}

/// Validates a complete dataset document.
#[derive(Debug, Clone, Copy)]
pub struct DatasetValidator<'r> {
    registry: &'r SchemaRegistry,
    options: DatasetOptions,
}

impl<'r> DatasetValidator<'r> {
    pub fn new(registry: &'r SchemaRegistry) -> Self {
        Self::with_options(registry, DatasetOptions::default())
    }

    pub fn with_options(registry: &'r SchemaRegistry, options: DatasetOptions) -> Self {
        Self { registry, options }
    }

    pub fn options(&self) -> DatasetOptions {
        self.options
    }

    /// Validate every entity collection and the relationships of `dataset`.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::InvalidInput`] if `dataset` is not an object, or
    ///   if it has a `relationships` value that is not an array.
    /// - [`ValidationError::UnknownSchema`] if a present collection has no
    ///   registered schema.
    pub fn validate_dataset(&self, dataset: &Value) -> Result<DatasetReport, ValidationError> {
        let document = dataset
            .as_object()
            .ok_or_else(|| ValidationError::expected_object("dataset", dataset))?;

        let layout = DatasetLayout::classify(document);
        for key in &layout.ignored_keys {
            match self.options.unknown_keys {
                UnknownKeyPolicy::Warn => {
                    tracing::warn!(key = key.as_str(), "ignoring unrecognized dataset key");
                }
                UnknownKeyPolicy::Ignore => {
                    tracing::debug!(key = key.as_str(), "ignoring unrecognized dataset key");
                }
            }
        }

        let mut collections = self.validate_collections(&layout.collections)?;

        let mut index = EntityIndex::new();
        for ((kind, items), report) in layout.collections.iter().zip(collections.iter_mut()) {
            for (position, entity) in items.iter().enumerate() {
                if let Some(first) = index.insert(*kind, position, entity) {
                    report.record_errors(position, entity.identifier(), vec![duplicate(entity, first)]);
                }
            }
            tracing::debug!(kind = %kind, indexed = index.len_of(*kind), "indexed entities");
        }

        let relationships = match layout.relationships {
            Some(value) => Some(
                RelationshipValidator::new(self.registry).validate_relationships(value, &index)?,
            ),
            None => None,
        };

        let report = DatasetReport::from_parts(collections, relationships, layout.ignored_keys);
        tracing::info!(
            total = report.total,
            invalid = report.total_invalid,
            success = report.success,
            "validated dataset"
        );
        Ok(report)
    }

    fn validate_collections(
        &self,
        collections: &[(EntityKind, &[Value])],
    ) -> Result<Vec<CollectionReport>, ValidationError> {
        let validator = CollectionValidator::new(self.registry);
        if self.options.parallel {
            collections
                .par_iter()
                .map(|(kind, items)| validator.validate_items(items, kind.schema_name()))
                .collect()
        } else {
            collections
                .iter()
                .map(|(kind, items)| validator.validate_items(items, kind.schema_name()))
                .collect()
        }
    }
}

/// The recognized parts of a dataset document.
struct DatasetLayout<'a> {
    collections: Vec<(EntityKind, &'a [Value])>,
    relationships: Option<&'a Value>,
    ignored_keys: Vec<String>,
}

impl<'a> DatasetLayout<'a> {
    fn classify(document: &'a Map<String, Value>) -> Self {
        let mut collections = Vec::new();
        let mut ignored_keys = Vec::new();

        for kind in EntityKind::all().iter().copied() {
            let plural = kind.collection_key();
            let singular = kind.schema_name();
            let key = match (document.contains_key(plural), document.contains_key(singular)) {
                (true, true) => {
                    tracing::warn!(key = singular, preferred = plural, "duplicate collection alias");
                    ignored_keys.push(singular.to_string());
                    plural
                }
                (true, false) => plural,
                (false, true) => singular,
                (false, false) => continue,
            };
            if let Some(items) = array_under(document, key) {
                collections.push((kind, items));
            }
        }

        let relationships = document.get(RELATIONSHIP_COLLECTION);

        for key in document.keys() {
            if key != RELATIONSHIP_COLLECTION && EntityKind::from_collection_key(key).is_none() {
                ignored_keys.push(key.clone());
            }
        }
        ignored_keys.sort();

        Self {
            collections,
            relationships,
            ignored_keys,
        }
    }
}

/// The array under an entity collection key; any other value is skipped
/// with a warning.
fn array_under<'a>(document: &'a Map<String, Value>, key: &str) -> Option<&'a [Value]> {
    match document.get(key)? {
        Value::Array(items) => Some(items.as_slice()),
        other => {
            tracing::warn!(
                key,
                found = crate::error::json_type_name(other),
                "skipping collection that is not an array"
            );
            None
        }
    }
}

fn duplicate(entity: &Value, first: usize) -> FieldError {
    let id = entity.identifier().unwrap_or_default();
    FieldError::new(
        "/id",
        "unique",
        format!("Duplicate id '{id}' (first used by item {first})"),
    )
    .with_param("id", id)
    .with_param("firstIndex", first)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn concept(id: &str, name: &str) -> Value {
        json!({"id": id, "name": name, "definition": "A field of study."})
    }

    #[test]
    fn test_non_object_dataset_is_rejected() {
        let registry = SchemaRegistry::builtin().unwrap();
        let err = DatasetValidator::new(&registry)
            .validate_dataset(&json!([]))
            .unwrap_err();
        assert!(matches!(
            err,
            ValidationError::InvalidInput { expected: "object", found: "array", .. }
        ));
    }

    #[test]
    fn test_unknown_keys_are_recorded_not_validated() {
        let registry = SchemaRegistry::builtin().unwrap();
        let dataset = json!({
            "concepts": [concept("7d444840-9dc0-11d1-b245-5ffdce74fad2", "One Health")],
            "organizations": [{"bogus": true}],
            "metadata": {"exported": "2024-01-01"}
        });
        let report = DatasetValidator::new(&registry)
            .validate_dataset(&dataset)
            .unwrap();
        assert!(report.success);
        assert_eq!(report.total, 1);
        assert_eq!(report.ignored_keys, vec!["metadata", "organizations"]);
    }

    #[test]
    fn test_singular_alias_is_accepted() {
        let registry = SchemaRegistry::builtin().unwrap();
        let dataset = json!({"concept": [concept("7d444840-9dc0-11d1-b245-5ffdce74fad2", "")]});
        let report = DatasetValidator::new(&registry)
            .validate_dataset(&dataset)
            .unwrap();
        assert_eq!(report.collection("concept").unwrap().invalid, 1);
    }

    #[test]
    fn test_plural_wins_over_singular_alias() {
        let registry = SchemaRegistry::builtin().unwrap();
        let dataset = json!({
            "concepts": [concept("7d444840-9dc0-11d1-b245-5ffdce74fad2", "One Health")],
            "concept": [{"broken": true}]
        });
        let report = DatasetValidator::new(&registry)
            .validate_dataset(&dataset)
            .unwrap();
        assert!(report.success);
        assert_eq!(report.collections.len(), 1);
        assert_eq!(report.ignored_keys, vec!["concept"]);
    }

    #[test]
    fn test_non_array_collection_is_skipped() {
        let registry = SchemaRegistry::builtin().unwrap();
        let dataset = json!({"events": {"id": "not-an-array"}, "relationships": []});
        let report = DatasetValidator::new(&registry)
            .validate_dataset(&dataset)
            .unwrap();
        assert!(report.collections.is_empty());
        assert_eq!(report.relationships.as_ref().unwrap().total, 0);
        assert!(report.success);
    }

    #[test]
    fn test_non_array_relationships_is_rejected() {
        let registry = SchemaRegistry::builtin().unwrap();
        for relationships in [json!("none"), json!({"r1": {"source_id": "nope"}}), json!(null)] {
            let dataset = json!({"events": [], "relationships": relationships});
            let err = DatasetValidator::new(&registry)
                .validate_dataset(&dataset)
                .unwrap_err();
            assert!(
                matches!(err, ValidationError::InvalidInput { expected: "array", .. }),
                "got: {err}"
            );
        }
    }

    #[test]
    fn test_duplicate_ids_flag_later_entity() {
        let registry = SchemaRegistry::builtin().unwrap();
        let id = "7d444840-9dc0-11d1-b245-5ffdce74fad2";
        let dataset = json!({"concepts": [concept(id, "One Health"), concept(id, "EcoHealth")]});
        let report = DatasetValidator::new(&registry)
            .validate_dataset(&dataset)
            .unwrap();

        let concepts = report.collection("concept").unwrap();
        assert_eq!((concepts.valid, concepts.invalid), (1, 1));
        let failure = &concepts.failures[0];
        assert_eq!(failure.index, 1);
        assert_eq!(failure.errors[0].path, "/id");
        assert_eq!(failure.errors[0].keyword, "unique");
        assert_eq!(failure.errors[0].params["firstIndex"], 0);
    }

    #[test]
    fn test_unknown_key_policy_deserializes_lowercase() {
        let policy: UnknownKeyPolicy = serde_json::from_value(json!("ignore")).unwrap();
        assert_eq!(policy, UnknownKeyPolicy::Ignore);
        assert_eq!(UnknownKeyPolicy::default(), UnknownKeyPolicy::Warn);
    }
}
