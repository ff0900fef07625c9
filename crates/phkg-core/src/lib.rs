//! # phkg-core — Foundational Types for the Knowledge Graph Validator
//!
//! This crate defines the primitives shared by every other `phkg-*` crate.
//! It depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Single `EntityKind` enum.** Event, Actor, Location, Concept and
//!    Publication are one closed sum type. Schema names, dataset collection
//!    keys and relationship endpoint types are all derived from it, so a new
//!    kind forces every exhaustive `match` to handle it.
//!
//! 2. **Identifier capability, not inheritance.** Entities stay as decoded
//!    JSON; [`HasIdentifier`] is the one capability the validators rely on.
//!
//! 3. **One error shape for every check.** Structural and referential
//!    violations are both [`FieldError`]s: a JSON Pointer, a message, the
//!    failed keyword and machine-readable parameters.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `phkg-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod identity;
pub mod kind;
pub mod violation;

pub use error::CoreError;
pub use identity::{EntityRef, HasIdentifier};
pub use kind::{EntityKind, ENTITY_KIND_COUNT, RELATIONSHIP_COLLECTION, RELATIONSHIP_SCHEMA};
pub use violation::{FieldError, ValidationResult};
