//! # Entity Kind
//!
//! Defines the `EntityKind` enum with the five entity kinds of the knowledge
//! graph. Every derived name (schema name, dataset collection key, display
//! name used by relationship endpoints) comes from this one definition.
//!
//! | Kind | Schema | Collection key | Endpoint type |
//! |------|--------|----------------|---------------|
//! | Event | `event` | `events` | `Event` |
//! | Actor | `actor` | `actors` | `Actor` |
//! | Location | `location` | `locations` | `Location` |
//! | Concept | `concept` | `concepts` | `Concept` |
//! | Publication | `publication` | `publications` | `Publication` |

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::CoreError;

/// Schema name used for relationship records.
pub const RELATIONSHIP_SCHEMA: &str = "relationship";

/// Dataset key holding the relationship sequence.
pub const RELATIONSHIP_COLLECTION: &str = "relationships";

/// Number of entity kinds.
pub const ENTITY_KIND_COUNT: usize = 5;

/// The kinds of entity a knowledge graph dataset can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// A dated occurrence (conference, policy, publication event, ...).
    Event,
    /// A person or organization.
    Actor,
    /// A country, city, region or site.
    Location,
    /// A theory, framework or term.
    Concept,
    /// A book, article or report.
    Publication,
}

impl EntityKind {
    /// All kinds in canonical processing order.
    pub fn all() -> &'static [EntityKind] {
        &[
            Self::Event,
            Self::Actor,
            Self::Location,
            Self::Concept,
            Self::Publication,
        ]
    }

    /// The registry name of the schema for this kind.
    pub fn schema_name(&self) -> &'static str {
        match self {
            Self::Event => "event",
            Self::Actor => "actor",
            Self::Location => "location",
            Self::Concept => "concept",
            Self::Publication => "publication",
        }
    }

    /// The dataset key holding entities of this kind.
    pub fn collection_key(&self) -> &'static str {
        match self {
            Self::Event => "events",
            Self::Actor => "actors",
            Self::Location => "locations",
            Self::Concept => "concepts",
            Self::Publication => "publications",
        }
    }

    /// The capitalized name used in relationship `source_type`/`target_type`.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Event => "Event",
            Self::Actor => "Actor",
            Self::Location => "Location",
            Self::Concept => "Concept",
            Self::Publication => "Publication",
        }
    }

    /// Resolve a dataset key to a kind.
    ///
    /// Accepts the plural collection key (`events`) and the singular schema
    /// name (`event`). Matching is exact; dataset keys are lowercase.
    pub fn from_collection_key(key: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|kind| kind.collection_key() == key || kind.schema_name() == key)
    }

    /// Resolve a relationship endpoint type (`"Event"`, `"event"`, ...).
    ///
    /// The declared type is lowercased before lookup.
    pub fn from_endpoint_type(declared: &str) -> Option<Self> {
        let lowered = declared.to_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|kind| kind.schema_name() == lowered)
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.type_name())
    }
}

impl FromStr for EntityKind {
    type Err = CoreError;

    /// Parse a kind from its endpoint type name, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_endpoint_type(s).ok_or_else(|| CoreError::UnknownEntityKind(s.to_string()))
    }
}
