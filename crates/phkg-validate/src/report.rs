//! # Report Model
//!
//! Aggregated verdicts for collections and whole datasets.
//!
//! ## Invariants
//!
//! - `valid + invalid == total` for every [`CollectionReport`].
//! - `failures` is sorted by input position and holds exactly one entry per
//!   invalid item.
//! - A [`DatasetReport`] is successful iff its `total_invalid` is zero.

use serde::Serialize;

use phkg_core::{FieldError, ValidationResult};

/// One invalid item of a collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemFailure {
    /// Position in the input sequence.
    pub index: usize,
    /// The item's `id`, or `item[<index>]` when it has none.
    pub id: String,
    /// Every violation found for this item.
    pub errors: Vec<FieldError>,
}

impl ItemFailure {
    /// Label an item by its identifier, falling back to its position.
    pub fn label(index: usize, id: Option<&str>) -> String {
        match id {
            Some(id) => id.to_string(),
            None => format!("item[{index}]"),
        }
    }
}

/// Verdicts for an ordered sequence validated against one schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionReport {
    /// Schema the items were validated against.
    pub schema: String,
    pub total: usize,
    pub valid: usize,
    pub invalid: usize,
    /// Invalid items in input order.
    pub failures: Vec<ItemFailure>,
}

impl CollectionReport {
    /// An empty report for `schema`.
    pub fn new(schema: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            total: 0,
            valid: 0,
            invalid: 0,
            failures: Vec::new(),
        }
    }

    /// Append the verdict for the next item in sequence.
    pub fn push(&mut self, id: Option<&str>, result: ValidationResult) {
        let index = self.total;
        self.total += 1;
        match result {
            ValidationResult::Valid => self.valid += 1,
            ValidationResult::Invalid { errors } => {
                self.invalid += 1;
                self.failures.push(ItemFailure {
                    index,
                    id: ItemFailure::label(index, id),
                    errors,
                });
            }
        }
    }

    /// Attach further errors to the item at `index`.
    ///
    /// Errors are appended after any already recorded for that item. An item
    /// that was valid becomes invalid and the counts move by one. Returns
    /// `true` when the item's verdict flipped.
    pub fn record_errors(&mut self, index: usize, id: Option<&str>, errors: Vec<FieldError>) -> bool {
        if errors.is_empty() || index >= self.total {
            return false;
        }
        match self.failures.binary_search_by_key(&index, |f| f.index) {
            Ok(pos) => {
                self.failures[pos].errors.extend(errors);
                false
            }
            Err(pos) => {
                self.failures.insert(
                    pos,
                    ItemFailure {
                        index,
                        id: ItemFailure::label(index, id),
                        errors,
                    },
                );
                self.valid -= 1;
                self.invalid += 1;
                true
            }
        }
    }

    /// The failure recorded for the item at `index`, if any.
    pub fn failure(&self, index: usize) -> Option<&ItemFailure> {
        self.failures
            .binary_search_by_key(&index, |f| f.index)
            .ok()
            .map(|pos| &self.failures[pos])
    }

    pub fn is_success(&self) -> bool {
        self.invalid == 0
    }
}

/// Aggregated verdicts for a whole dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetReport {
    /// One report per entity collection present, in kind order.
    pub collections: Vec<CollectionReport>,
    /// The relationship report, when the dataset carries relationships.
    pub relationships: Option<CollectionReport>,
    pub total: usize,
    pub total_valid: usize,
    pub total_invalid: usize,
    pub success: bool,
    /// Top-level keys that were neither an entity collection nor relationships.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ignored_keys: Vec<String>,
}

impl DatasetReport {
    /// Assemble a dataset report and compute its totals.
    pub fn from_parts(
        collections: Vec<CollectionReport>,
        relationships: Option<CollectionReport>,
        ignored_keys: Vec<String>,
    ) -> Self {
        let (total, total_valid, total_invalid) = collections
            .iter()
            .chain(relationships.iter())
            .fold((0, 0, 0), |(t, v, i), r| (t + r.total, v + r.valid, i + r.invalid));

        Self {
            collections,
            relationships,
            total,
            total_valid,
            total_invalid,
            success: total_invalid == 0,
            ignored_keys,
        }
    }

    /// The report for the entity collection validated against `schema`.
    pub fn collection(&self, schema: &str) -> Option<&CollectionReport> {
        self.collections.iter().find(|r| r.schema == schema)
    }

    /// Entity collection reports followed by the relationship report.
    pub fn reports(&self) -> impl Iterator<Item = &CollectionReport> {
        self.collections.iter().chain(self.relationships.iter())
    }
}
