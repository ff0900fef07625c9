//! # Entity Index
//!
//! Transient `(kind, id) -> entity` lookup built during one dataset pass and
//! used only to resolve relationship endpoints.
//!
//! Entities are indexed whether or not they passed structural validation;
//! only an entity without a usable `id` is left out. The first entity seen
//! for an id stays the lookup target.

use std::collections::HashMap;

use serde_json::Value;

use phkg_core::{EntityKind, EntityRef, HasIdentifier};

#[derive(Debug, Clone, Copy)]
struct Entry<'a> {
    position: usize,
    entity: &'a Value,
}

/// Identifier index over the entities of one dataset.
#[derive(Debug, Default)]
pub struct EntityIndex<'a> {
    by_kind: HashMap<EntityKind, HashMap<&'a str, Entry<'a>>>,
}

impl<'a> EntityIndex<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index `entity`, found at `position` in its collection.
    ///
    /// Returns the position of an entity of the same kind already indexed
    /// under the same id; the earlier entry is kept. Entities without a
    /// usable id are skipped and return `None`.
    pub fn insert(&mut self, kind: EntityKind, position: usize, entity: &'a Value) -> Option<usize> {
        let id = entity.identifier()?;
        let entries = self.by_kind.entry(kind).or_default();
        match entries.get(id) {
            Some(existing) => Some(existing.position),
            None => {
                entries.insert(id, Entry { position, entity });
                None
            }
        }
    }

    /// The entity of `kind` indexed under `id`.
    pub fn get(&self, kind: EntityKind, id: &str) -> Option<EntityRef<'a>> {
        self.by_kind
            .get(&kind)
            .and_then(|entries| entries.get(id))
            .map(|entry| EntityRef::new(kind, entry.entity))
    }

    /// Position of the indexed entity within its collection.
    pub fn position_of(&self, kind: EntityKind, id: &str) -> Option<usize> {
        self.by_kind
            .get(&kind)
            .and_then(|entries| entries.get(id))
            .map(|entry| entry.position)
    }

    /// Resolve a relationship endpoint by its declared type name.
    ///
    /// The type is matched case-insensitively; an unrecognized type never
    /// resolves.
    pub fn resolve(&self, declared_type: &str, id: &str) -> Option<EntityRef<'a>> {
        EntityKind::from_endpoint_type(declared_type).and_then(|kind| self.get(kind, id))
    }

    pub fn contains(&self, kind: EntityKind, id: &str) -> bool {
        self.get(kind, id).is_some()
    }

    /// Number of indexed entities of `kind`.
    pub fn len_of(&self, kind: EntityKind) -> usize {
        self.by_kind.get(&kind).map_or(0, HashMap::len)
    }

    pub fn len(&self) -> usize {
        self.by_kind.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
