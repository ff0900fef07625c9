//! # Closed-World Policy Audit
//!
//! Every entity and relationship schema must reject fields it does not
//! declare, so typos (`titel`) and schema drift surface as validation errors
//! instead of silently passing through.
//!
//! [`audit_closed_world`] walks a schema document and reports each object
//! schema whose `additionalProperties` is `true` or absent. Fields listed in
//! [`EXTENSIBLE_FIELDS`] are exempt: they carry free-form pipeline context.
//!
//! The audit only reports. It never modifies a schema.

use serde_json::Value;

/// Object schemas under these names may stay open.
pub const EXTENSIBLE_FIELDS: &[&str] = &["relationship_context"];

/// An object schema that admits undeclared fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyFinding {
    /// Registry name of the audited schema.
    pub schema_name: String,
    /// JSON Pointer within the schema document to the open object schema.
    pub path: String,
    /// The current `additionalProperties` setting.
    pub current_value: String,
}

impl std::fmt::Display for PolicyFinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: additionalProperties={} at {} (expected false)",
            self.schema_name, self.current_value, self.path,
        )
    }
}

/// Report every open object schema in `schema`.
pub fn audit_closed_world(schema_name: &str, schema: &Value) -> Vec<PolicyFinding> {
    let mut findings = Vec::new();
    check_node(schema_name, schema, "", &mut findings);
    findings
}

fn check_node(schema_name: &str, node: &Value, path: &str, findings: &mut Vec<PolicyFinding>) {
    let Some(obj) = node.as_object() else {
        return;
    };

    let is_object_type = match obj.get("type") {
        Some(Value::String(t)) => t == "object",
        Some(Value::Array(types)) => types.iter().any(|t| t == "object"),
        _ => false,
    };

    let last_segment = path.rsplit('/').next().unwrap_or("");
    if is_object_type && !EXTENSIBLE_FIELDS.contains(&last_segment) {
        let current_value = match obj.get("additionalProperties") {
            Some(Value::Bool(false)) | Some(Value::Object(_)) => None,
            Some(other) => Some(other.to_string()),
            None => Some("absent (defaults to true)".to_string()),
        };
        if let Some(current_value) = current_value {
            findings.push(PolicyFinding {
                schema_name: schema_name.to_string(),
                path: if path.is_empty() {
                    "/".to_string()
                } else {
                    path.to_string()
                },
                current_value,
            });
        }
    }

    if let Some(properties) = obj.get("properties").and_then(Value::as_object) {
        for (key, value) in properties {
            check_node(schema_name, value, &format!("{path}/properties/{key}"), findings);
        }
    }

    for defs_key in ["definitions", "$defs"] {
        if let Some(defs) = obj.get(defs_key).and_then(Value::as_object) {
            for (key, value) in defs {
                check_node(schema_name, value, &format!("{path}/{defs_key}/{key}"), findings);
            }
        }
    }

    if let Some(items) = obj.get("items") {
        check_node(schema_name, items, &format!("{path}/items"), findings);
    }

    for combiner in ["oneOf", "anyOf", "allOf", "prefixItems"] {
        if let Some(variants) = obj.get(combiner).and_then(Value::as_array) {
            for (i, variant) in variants.iter().enumerate() {
                check_node(schema_name, variant, &format!("{path}/{combiner}/{i}"), findings);
            }
        }
    }
}
