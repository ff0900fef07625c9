//! # Dataset Validation Scenarios
//!
//! End-to-end dataset passes over the built-in schema set: structural
//! failures, dangling relationship endpoints, fully conformant datasets,
//! operational errors, idempotence and the parallel path.

use serde_json::{json, Value};
use uuid::Uuid;

use phkg_schema::SchemaRegistry;
use phkg_validate::{
    render_dataset, CollectionValidator, DatasetOptions, DatasetValidator, ValidationError,
    Verbosity,
};

/// Helper: a fresh v4 identifier.
fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Helper: a conformant dataset with one entity of every kind and two
/// resolving relationships. Returns the dataset and the actor's id.
fn conformant_dataset() -> (Value, String) {
    let event_id = new_id();
    let actor_id = new_id();
    let location_id = new_id();
    let concept_id = new_id();
    let publication_id = new_id();

    let dataset = json!({
        "events": [{
            "id": event_id,
            "title": "Launch of the Planetary Health Alliance",
            "year": 2016,
            "description": "A consortium of universities and NGOs forms around planetary health.",
            "type": "Organization",
            "significance": 4,
            "dates": {"start": "2016-04-01"},
            "actors": ["Harvard University"],
            "locations": ["Boston"]
        }],
        "actors": [{
            "id": actor_id,
            "name": "Harvard University",
            "type": "Institution"
        }],
        "locations": [{
            "id": location_id,
            "name": "Boston",
            "type": "City",
            "coordinates": {"type": "Point", "coordinates": [-71.0589, 42.3601]}
        }],
        "concepts": [{
            "id": concept_id,
            "name": "Planetary Health",
            "definition": "The health of human civilization and the natural systems on which it depends."
        }],
        "publications": [{
            "id": publication_id,
            "title": "Safeguarding human health in the Anthropocene epoch",
            "type": "Journal Article"
        }],
        "relationships": [
            {
                "id": new_id(),
                "source_id": actor_id,
                "source_type": "Actor",
                "target_id": event_id,
                "target_type": "Event",
                "relationship_type": "Participates",
                "strength": 5
            },
            {
                "id": new_id(),
                "source_id": publication_id,
                "source_type": "publication",
                "target_id": concept_id,
                "target_type": "concept",
                "relationship_type": "Introduces"
            }
        ]
    });
    (dataset, actor_id)
}

fn registry() -> SchemaRegistry {
    SchemaRegistry::builtin().unwrap()
}

// -- Scenarios ----------------------------------------------------------------

#[test]
fn test_scenario_event_missing_title() {
    let registry = registry();
    let (mut dataset, _) = conformant_dataset();
    dataset["events"][0].as_object_mut().unwrap().remove("title");

    let report = DatasetValidator::new(&registry)
        .validate_dataset(&dataset)
        .unwrap();

    assert!(!report.success);
    let events = report.collection("event").unwrap();
    assert_eq!(events.invalid, 1);
    assert_eq!(events.failures[0].errors.len(), 1);
    assert_eq!(events.failures[0].errors[0].path, "/title");
    // The event is still indexed, so the relationship pointing at it resolves.
    assert!(report.relationships.as_ref().unwrap().is_success());
}

#[test]
fn test_scenario_dangling_actor_target() {
    let registry = registry();
    let (mut dataset, _) = conformant_dataset();
    let missing = new_id();
    let event_id = dataset["events"][0]["id"].clone();
    dataset["relationships"][0]["source_type"] = json!("Event");
    dataset["relationships"][0]["source_id"] = event_id;
    dataset["relationships"][0]["target_type"] = json!("Actor");
    dataset["relationships"][0]["target_id"] = json!(missing);

    let report = DatasetValidator::new(&registry)
        .validate_dataset(&dataset)
        .unwrap();

    let relationships = report.relationships.as_ref().unwrap();
    assert_eq!(relationships.invalid, 1);
    assert_eq!(relationships.valid, 1);
    let error = &relationships.failures[0].errors[0];
    assert_eq!(error.path, "/target_id");
    assert!(error.message.contains(&missing), "message: {}", error.message);
    assert!(!report.success);
    assert_eq!(report.total_invalid, 1);
}

#[test]
fn test_scenario_fully_conformant_dataset() {
    let registry = registry();
    let (dataset, _) = conformant_dataset();

    let report = DatasetValidator::new(&registry)
        .validate_dataset(&dataset)
        .unwrap();

    assert!(report.success, "{}", render_dataset(&report, Verbosity::Detailed));
    assert_eq!(report.total_invalid, 0);
    assert_eq!(report.total, 7);
    assert_eq!(report.collections.len(), 5);
    let order: Vec<&str> = report.collections.iter().map(|c| c.schema.as_str()).collect();
    assert_eq!(order, vec!["event", "actor", "location", "concept", "publication"]);
}

#[test]
fn test_scenario_collection_given_single_object() {
    let registry = registry();
    let (dataset, _) = conformant_dataset();

    let err = CollectionValidator::new(&registry)
        .validate_all(&dataset["actors"][0], "actor")
        .unwrap_err();

    assert!(matches!(err, ValidationError::InvalidInput { .. }));
}

// -- Referential integrity ----------------------------------------------------

#[test]
fn test_structurally_invalid_entity_still_resolves_endpoints() {
    let registry = registry();
    let (mut dataset, actor_id) = conformant_dataset();
    dataset["actors"][0]["type"] = json!("Corporation");

    let report = DatasetValidator::new(&registry)
        .validate_dataset(&dataset)
        .unwrap();

    assert_eq!(report.collection("actor").unwrap().invalid, 1);
    assert_eq!(report.collection("actor").unwrap().failures[0].id, actor_id);
    assert!(report.relationships.as_ref().unwrap().is_success());
}

#[test]
fn test_entity_without_id_cannot_be_an_endpoint() {
    let registry = registry();
    let (mut dataset, actor_id) = conformant_dataset();
    dataset["actors"][0].as_object_mut().unwrap().remove("id");

    let report = DatasetValidator::new(&registry)
        .validate_dataset(&dataset)
        .unwrap();

    let actors = report.collection("actor").unwrap();
    assert_eq!(actors.failures[0].id, "item[0]");
    let relationships = report.relationships.as_ref().unwrap();
    let error = &relationships.failures[0].errors[0];
    assert_eq!(error.path, "/source_id");
    assert_eq!(
        error.message,
        format!("Source entity '{actor_id}' of type 'Actor' not found")
    );
}

#[test]
fn test_relationships_without_entities_all_dangle() {
    let registry = registry();
    let (dataset, _) = conformant_dataset();
    let only_relationships = json!({"relationships": dataset["relationships"].clone()});

    let report = DatasetValidator::new(&registry)
        .validate_dataset(&only_relationships)
        .unwrap();

    let relationships = report.relationships.as_ref().unwrap();
    assert_eq!((relationships.valid, relationships.invalid), (0, 2));
    for failure in &relationships.failures {
        let paths: Vec<&str> = failure.errors.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["/source_id", "/target_id"]);
    }
}

#[test]
fn test_counts_never_double_count_a_relationship() {
    let registry = registry();
    let (mut dataset, _) = conformant_dataset();
    dataset["relationships"][0]["relationship_type"] = json!("Funds");
    dataset["relationships"][0]["target_id"] = json!(new_id());

    let report = DatasetValidator::new(&registry)
        .validate_dataset(&dataset)
        .unwrap();

    let relationships = report.relationships.as_ref().unwrap();
    assert_eq!(relationships.total, 2);
    assert_eq!(relationships.valid + relationships.invalid, relationships.total);
    assert_eq!(relationships.invalid, 1);
    let keywords: Vec<&str> = relationships.failures[0]
        .errors
        .iter()
        .map(|e| e.keyword.as_str())
        .collect();
    assert_eq!(keywords, vec!["enum", "reference"]);
}

// -- Determinism --------------------------------------------------------------

#[test]
fn test_validation_is_idempotent() {
    let registry = registry();
    let (mut dataset, _) = conformant_dataset();
    dataset["events"][0]["year"] = json!(1492);
    dataset["relationships"][1]["target_id"] = json!(new_id());
    dataset["extras"] = json!({"note": "auxiliary"});

    let validator = DatasetValidator::new(&registry);
    let first = validator.validate_dataset(&dataset).unwrap();
    let second = validator.validate_dataset(&dataset).unwrap();

    assert_eq!(first, second);
    assert_eq!(
        render_dataset(&first, Verbosity::Detailed),
        render_dataset(&second, Verbosity::Detailed)
    );
}

#[test]
fn test_parallel_matches_sequential() {
    let registry = registry();
    let (mut dataset, _) = conformant_dataset();
    dataset["concepts"][0]["name"] = json!("");
    dataset["locations"][0]["coordinates"]["coordinates"] = json!([200.0, 10.0]);

    let sequential = DatasetValidator::new(&registry)
        .validate_dataset(&dataset)
        .unwrap();
    let parallel = DatasetValidator::with_options(
        &registry,
        DatasetOptions {
            parallel: true,
            ..DatasetOptions::default()
        },
    )
    .validate_dataset(&dataset)
    .unwrap();

    assert_eq!(sequential, parallel);
    assert_eq!(parallel.total_invalid, 2);
}

#[test]
fn test_report_serializes_to_json() {
    let registry = registry();
    let (mut dataset, _) = conformant_dataset();
    dataset["publications"][0]["titel"] = json!("typo");

    let report = DatasetValidator::new(&registry)
        .validate_dataset(&dataset)
        .unwrap();
    let value = serde_json::to_value(&report).unwrap();

    assert_eq!(value["success"], false);
    assert_eq!(value["total_invalid"], 1);
    let error = &value["collections"][4]["failures"][0]["errors"][0];
    assert_eq!(error["path"], "/titel");
    assert_eq!(error["keyword"], "additionalProperties");
    assert_eq!(error["params"]["additionalProperty"], "titel");
}
