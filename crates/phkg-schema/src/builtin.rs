//! Built-in schema set, embedded from the repository `schemas/` directory.

/// `(name, document)` pairs for every schema shipped with the validator.
///
/// `common` carries the shared `$defs` referenced by the others.
pub const BUILTIN_SCHEMAS: &[(&str, &str)] = &[
    ("common", include_str!("../../../schemas/common.schema.json")),
    ("event", include_str!("../../../schemas/event.schema.json")),
    ("actor", include_str!("../../../schemas/actor.schema.json")),
    ("location", include_str!("../../../schemas/location.schema.json")),
    ("concept", include_str!("../../../schemas/concept.schema.json")),
    ("publication", include_str!("../../../schemas/publication.schema.json")),
    ("relationship", include_str!("../../../schemas/relationship.schema.json")),
];
