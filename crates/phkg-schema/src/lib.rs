//! # phkg-schema — Schema Registry
//!
//! Loads the named JSON Schema definitions (one per entity kind plus one for
//! relationships), compiles them once, and serves them by name.
//!
//! ## Registry (`registry`)
//!
//! [`SchemaRegistry`] is an explicitly constructed, immutable value. It is
//! populated through a [`SchemaRegistryBuilder`] from the built-in schema set
//! ([`SchemaRegistry::builtin`]), from a directory of `*.schema.json` files
//! ([`SchemaRegistry::load_dir`]), or from documents registered by hand.
//! Cross-schema `$ref`s are resolved from the registered documents only;
//! the registry never touches the network.
//!
//! ## Structural check (`check`)
//!
//! [`SchemaDefinition::check`] runs every constraint of a compiled schema
//! over an instance and maps each violation to a [`phkg_core::FieldError`].
//!
//! ## Closed-world policy (`policy`)
//!
//! [`audit_closed_world`] reports object schemas that accept undeclared
//! fields. The builder can refuse to build a registry containing one.

pub mod builtin;
mod check;
pub mod policy;
pub mod registry;

pub use builtin::BUILTIN_SCHEMAS;
pub use policy::{audit_closed_world, PolicyFinding, EXTENSIBLE_FIELDS};
pub use registry::{
    RegistryError, RegistrySource, SchemaDefinition, SchemaRegistry, SchemaRegistryBuilder,
    SCHEMA_FILE_SUFFIX, SCHEMA_URI_PREFIX,
};
