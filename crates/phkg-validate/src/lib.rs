//! # phkg-validate — Knowledge Graph Validation
//!
//! Structural and referential validation of planetary health knowledge graph
//! data against the schemas held by a [`phkg_schema::SchemaRegistry`].
//!
//! ## Layers
//!
//! - [`EntityValidator`]: one item against one named schema; every
//!   violation reported in a single pass.
//! - [`CollectionValidator`]: an array of items against one schema, no
//!   fail-fast, failures in input order.
//! - [`RelationshipValidator`]: relationships checked structurally and then
//!   against an [`EntityIndex`]; dangling endpoints become `reference` errors.
//! - [`DatasetValidator`]: a whole dataset document; builds the index from
//!   every entity collection before relationships are checked.
//!
//! Rendering lives in [`format`]; it never alters a verdict.
//!
//! ## Errors
//!
//! Structural and referential violations are data, carried in reports.
//! [`ValidationError`] is reserved for calls that cannot run at all: input of
//! the wrong shape, or a schema name the registry does not know.
//!
//! ## Crate Policy
//!
//! - Validators borrow an immutable registry; no global state.
//! - No `unsafe` code.
//! - No `.unwrap()` outside tests.

pub mod collection;
pub mod dataset;
pub mod entity;
pub mod error;
pub mod format;
pub mod index;
pub mod relationship;
pub mod report;

pub use collection::CollectionValidator;
pub use dataset::{DatasetOptions, DatasetValidator, UnknownKeyPolicy};
pub use entity::EntityValidator;
pub use error::ValidationError;
pub use format::{render_collection, render_dataset, Verbosity};
pub use index::EntityIndex;
pub use relationship::RelationshipValidator;
pub use report::{CollectionReport, DatasetReport, ItemFailure};
