//! # Schema Registry
//!
//! Named, compiled JSON Schema (Draft 2020-12) definitions.
//!
//! ## Lifecycle
//!
//! Schemas are registered into a [`SchemaRegistryBuilder`] during a single
//! load pass. Registering the same name twice in one pass is an error.
//! [`SchemaRegistryBuilder::build`] compiles every document and returns an
//! immutable [`SchemaRegistry`]; reloading means building a new registry.
//!
//! ## Schema Resolution
//!
//! Schemas carry `$id` URIs of the form
//! `https://schemas.planetary-health.org/kg/<name>.schema.json` and refer to
//! each other with relative `$ref`s (`common.schema.json#/$defs/rating`).
//! A local retriever serves those URIs from the registered documents, keyed
//! by `$id`, by the canonical prefix and by bare file name. Anything else
//! fails compilation.
//!
//! A document that only carries `$defs` (such as `common`) is a shared
//! definitions document: it is served to `$ref`s but is never compiled into
//! a validation target, so [`SchemaRegistry::resolve`] rejects its name.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use jsonschema::{Retrieve, Uri, Validator};
use serde_json::Value;
use thiserror::Error;

use phkg_core::FieldError;

use crate::builtin::BUILTIN_SCHEMAS;
use crate::check::collect_field_errors;
use crate::policy::{audit_closed_world, PolicyFinding};

/// URI prefix of every schema `$id` in this repository.
pub const SCHEMA_URI_PREFIX: &str = "https://schemas.planetary-health.org/kg/";

/// File name suffix of schema documents on disk.
pub const SCHEMA_FILE_SUFFIX: &str = ".schema.json";

/// Errors raised while populating or querying the registry.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// A schema name was registered twice in the same load pass.
    #[error("schema '{0}' is already registered")]
    DuplicateSchema(String),

    /// No schema is registered under the requested name.
    #[error("unknown schema: {0}")]
    UnknownSchema(String),

    /// A schema document could not be read or parsed.
    #[error("failed to load schema {path}: {reason}")]
    SchemaLoad {
        /// File path or registration name.
        path: String,
        /// Human-readable reason.
        reason: String,
    },

    /// A schema document could not be compiled into a validator.
    #[error("failed to compile schema {name}: {reason}")]
    SchemaCompile {
        /// Registration name.
        name: String,
        /// Human-readable reason.
        reason: String,
    },

    /// Closed-world enforcement is on and the schema admits undeclared fields.
    #[error("schema {name} admits undeclared fields at {} location(s)", .findings.len())]
    OpenSchema {
        /// Registration name.
        name: String,
        /// Every open object schema found.
        findings: Vec<PolicyFinding>,
    },

    /// I/O error while walking a schema directory.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Where the registered documents came from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RegistrySource {
    /// The schema set embedded at compile time.
    Builtin,
    /// A directory of `*.schema.json` files.
    Directory(PathBuf),
    /// Documents registered individually.
    #[default]
    Manual,
}

impl std::fmt::Display for RegistrySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Builtin => f.write_str("built-in"),
            Self::Directory(dir) => write!(f, "{}", dir.display()),
            Self::Manual => f.write_str("manual"),
        }
    }
}

/// Root keywords that leave a document without any validation behaviour.
const ANNOTATION_KEYWORDS: &[&str] = &["$schema", "$id", "$comment", "title", "description"];

/// Whether `document` only provides `$defs` for other schemas.
fn is_definitions_only(document: &Value) -> bool {
    let Some(root) = document.as_object() else {
        return false;
    };
    root.contains_key("$defs")
        && root
            .keys()
            .all(|key| key == "$defs" || ANNOTATION_KEYWORDS.contains(&key.as_str()))
}

/// Serves cross-schema `$ref`s from the registered documents.
struct LocalSchemaRetriever {
    schemas_by_uri: Arc<HashMap<String, Value>>,
}

impl Retrieve for LocalSchemaRetriever {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        let uri_str = uri.as_str();

        if let Some(value) = self.schemas_by_uri.get(uri_str) {
            return Ok(value.clone());
        }

        // Documents registered without an `$id` get a non-http base URI, so
        // fall back to the trailing file name.
        let filename = uri_str.rsplit('/').next().unwrap_or(uri_str);
        self.schemas_by_uri
            .get(filename)
            .cloned()
            .ok_or_else(|| format!("schema not found for URI: {uri_str}").into())
    }
}

/// One compiled, named schema.
pub struct SchemaDefinition {
    name: String,
    document: Value,
    validator: Validator,
    required: Vec<String>,
    declared: BTreeSet<String>,
    closed: bool,
}

impl std::fmt::Debug for SchemaDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaDefinition")
            .field("name", &self.name)
            .field("required", &self.required)
            .field("declared", &self.declared.len())
            .field("closed", &self.closed)
            .finish()
    }
}

impl SchemaDefinition {
    fn new(name: String, document: Value, validator: Validator) -> Self {
        let required = document
            .get("required")
            .and_then(Value::as_array)
            .map(|fields| {
                fields
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default();
        let declared = document
            .get("properties")
            .and_then(Value::as_object)
            .map(|props| props.keys().cloned().collect())
            .unwrap_or_default();
        let closed = document.get("additionalProperties") == Some(&Value::Bool(false));

        Self {
            name,
            document,
            validator,
            required,
            declared,
            closed,
        }
    }

    /// The registration name (`"event"`, `"relationship"`, ...).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The raw schema document.
    pub fn document(&self) -> &Value {
        &self.document
    }

    /// Top-level required field names, in schema order.
    pub fn required_fields(&self) -> &[String] {
        &self.required
    }

    /// Every top-level field name the schema declares.
    pub fn declared_fields(&self) -> &BTreeSet<String> {
        &self.declared
    }

    /// Whether undeclared top-level fields are rejected.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Run every constraint over `instance` and return all violations.
    ///
    /// Never stops at the first failure. An empty vector means the
    /// instance conforms.
    pub fn check(&self, instance: &Value) -> Vec<FieldError> {
        collect_field_errors(&self.validator, instance)
    }
}

/// Collects schema documents for one load pass.
#[derive(Debug, Default)]
pub struct SchemaRegistryBuilder {
    documents: BTreeMap<String, Value>,
    require_closed: bool,
    source: RegistrySource,
}

impl SchemaRegistryBuilder {
    /// Register `document` under `name`.
    ///
    /// # Errors
    ///
    /// [`RegistryError::DuplicateSchema`] if `name` was already registered
    /// in this pass.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        document: Value,
    ) -> Result<&mut Self, RegistryError> {
        let name = name.into();
        if self.documents.contains_key(&name) {
            return Err(RegistryError::DuplicateSchema(name));
        }
        self.documents.insert(name, document);
        Ok(self)
    }

    /// Register the embedded schema set.
    pub fn register_builtin(&mut self) -> Result<&mut Self, RegistryError> {
        for (name, text) in BUILTIN_SCHEMAS {
            let document: Value =
                serde_json::from_str(text).map_err(|e| RegistryError::SchemaLoad {
                    path: format!("{name}{SCHEMA_FILE_SUFFIX}"),
                    reason: format!("invalid JSON: {e}"),
                })?;
            self.register(*name, document)?;
        }
        self.source = RegistrySource::Builtin;
        Ok(self)
    }

    /// Register every `*.schema.json` file under `dir`.
    ///
    /// The schema name is the file name without the `.schema.json` suffix.
    /// Files are registered in sorted path order.
    pub fn register_dir(&mut self, dir: impl AsRef<Path>) -> Result<&mut Self, RegistryError> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(RegistryError::SchemaLoad {
                path: dir.display().to_string(),
                reason: "not a directory".to_string(),
            });
        }

        let mut paths = Vec::new();
        walk_for_schemas(dir, &mut paths)?;
        paths.sort();

        for path in paths {
            let Some(name) = path
                .file_name()
                .and_then(|f| f.to_str())
                .and_then(|f| f.strip_suffix(SCHEMA_FILE_SUFFIX))
            else {
                continue;
            };

            let content =
                std::fs::read_to_string(&path).map_err(|e| RegistryError::SchemaLoad {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                })?;
            let document: Value =
                serde_json::from_str(&content).map_err(|e| RegistryError::SchemaLoad {
                    path: path.display().to_string(),
                    reason: format!("invalid JSON: {e}"),
                })?;

            tracing::debug!(schema = name, path = %path.display(), "registering schema file");
            self.register(name, document)?;
        }

        self.source = RegistrySource::Directory(dir.to_path_buf());
        Ok(self)
    }

    /// Refuse to build if any schema admits undeclared fields.
    pub fn require_closed(&mut self, yes: bool) -> &mut Self {
        self.require_closed = yes;
        self
    }

    /// Compile every registered document into an immutable registry.
    ///
    /// # Errors
    ///
    /// [`RegistryError::OpenSchema`] when closed-world enforcement is on and
    /// a schema is open; [`RegistryError::SchemaCompile`] when a document is
    /// not a valid schema or has an unresolvable `$ref`.
    pub fn build(self) -> Result<SchemaRegistry, RegistryError> {
        let mut schemas_by_uri: HashMap<String, Value> = HashMap::new();
        for (name, document) in &self.documents {
            let filename = format!("{name}{SCHEMA_FILE_SUFFIX}");
            schemas_by_uri.insert(format!("{SCHEMA_URI_PREFIX}{filename}"), document.clone());
            if let Some(id) = document.get("$id").and_then(Value::as_str) {
                schemas_by_uri.insert(id.to_string(), document.clone());
            }
            schemas_by_uri.insert(filename, document.clone());
        }
        let schemas_by_uri = Arc::new(schemas_by_uri);

        let mut definitions = BTreeMap::new();
        let mut shared = BTreeMap::new();
        for (name, document) in self.documents {
            if self.require_closed {
                let findings = audit_closed_world(&name, &document);
                if !findings.is_empty() {
                    return Err(RegistryError::OpenSchema { name, findings });
                }
            }

            if is_definitions_only(&document) {
                tracing::debug!(schema = %name, "registered shared definitions");
                shared.insert(name, document);
                continue;
            }

            let validator = jsonschema::options()
                .with_draft(jsonschema::Draft::Draft202012)
                .should_validate_formats(true)
                .with_retriever(LocalSchemaRetriever {
                    schemas_by_uri: Arc::clone(&schemas_by_uri),
                })
                .build(&document)
                .map_err(|e| RegistryError::SchemaCompile {
                    name: name.clone(),
                    reason: e.to_string(),
                })?;

            definitions.insert(name.clone(), SchemaDefinition::new(name, document, validator));
        }

        tracing::debug!(
            schema_count = definitions.len(),
            shared_count = shared.len(),
            source = %self.source,
            "built schema registry"
        );

        Ok(SchemaRegistry {
            definitions,
            shared,
            source: self.source,
        })
    }
}

/// Immutable lookup table of compiled schemas.
///
/// `Send + Sync`: one registry can serve validators on many threads.
#[derive(Debug)]
pub struct SchemaRegistry {
    definitions: BTreeMap<String, SchemaDefinition>,
    shared: BTreeMap<String, Value>,
    source: RegistrySource,
}

impl SchemaRegistry {
    /// Start a load pass.
    pub fn builder() -> SchemaRegistryBuilder {
        SchemaRegistryBuilder::default()
    }

    /// Registry over the embedded schema set.
    pub fn builtin() -> Result<Self, RegistryError> {
        let mut builder = Self::builder();
        builder.register_builtin()?;
        builder.build()
    }

    /// Registry over every `*.schema.json` file in `dir`.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let mut builder = Self::builder();
        builder.register_dir(dir)?;
        builder.build()
    }

    /// Look up a schema by name.
    ///
    /// # Errors
    ///
    /// [`RegistryError::UnknownSchema`] if no validation target is registered
    /// under `name`. Shared definitions documents are not targets.
    pub fn resolve(&self, name: &str) -> Result<&SchemaDefinition, RegistryError> {
        self.definitions
            .get(name)
            .ok_or_else(|| RegistryError::UnknownSchema(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.definitions.keys().map(String::as_str).collect()
    }

    /// Every definition, sorted by name.
    pub fn definitions(&self) -> impl Iterator<Item = &SchemaDefinition> {
        self.definitions.values()
    }

    /// Shared definitions documents, sorted by name.
    pub fn shared_documents(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.shared.iter().map(|(name, document)| (name.as_str(), document))
    }

    /// Number of validation targets.
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    pub fn source(&self) -> &RegistrySource {
        &self.source
    }
}

fn walk_for_schemas(dir: &Path, acc: &mut Vec<PathBuf>) -> Result<(), RegistryError> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            walk_for_schemas(&path, acc)?;
        } else if path
            .file_name()
            .and_then(|f| f.to_str())
            .is_some_and(|f| f.ends_with(SCHEMA_FILE_SUFFIX))
        {
            acc.push(path);
        }
    }
    Ok(())
}
