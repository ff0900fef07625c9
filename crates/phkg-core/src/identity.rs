//! # Entity Identity
//!
//! Entities stay in their decoded JSON form. The validators only need one
//! capability from them: a usable identifier. [`HasIdentifier`] expresses
//! that capability and [`EntityRef`] pairs an entity with its kind.

use serde_json::Value;

use crate::kind::EntityKind;

/// Capability shared by every entity kind and by relationships.
pub trait HasIdentifier {
    /// The `id` field, if it is present and a non-empty string.
    fn identifier(&self) -> Option<&str>;
}

impl HasIdentifier for Value {
    fn identifier(&self) -> Option<&str> {
        self.get("id")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
    }
}

impl HasIdentifier for serde_json::Map<String, Value> {
    fn identifier(&self) -> Option<&str> {
        self.get("id")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
    }
}

/// A borrowed entity tagged with its kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntityRef<'a> {
    /// The entity kind.
    pub kind: EntityKind,
    /// The decoded entity object.
    pub value: &'a Value,
}

impl<'a> EntityRef<'a> {
    /// Pair a decoded value with its kind.
    pub fn new(kind: EntityKind, value: &'a Value) -> Self {
        Self { kind, value }
    }

    /// The entity's display name: `title` for events and publications,
    /// `name` for the other kinds.
    pub fn display_name(&self) -> Option<&'a str> {
        let field = match self.kind {
            EntityKind::Event | EntityKind::Publication => "title",
            EntityKind::Actor | EntityKind::Location | EntityKind::Concept => "name",
        };
        self.value.get(field).and_then(Value::as_str)
    }
}

impl HasIdentifier for EntityRef<'_> {
    fn identifier(&self) -> Option<&str> {
        self.value.identifier()
    }
}
