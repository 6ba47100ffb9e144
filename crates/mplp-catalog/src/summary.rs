//! # Schema Summary
//!
//! A compact, serializable digest of one schema document: identity,
//! declared protocol version, root property names and definitions.

use crate::types::ModuleName;
use crate::walk::walk_schema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Summary of a module's schema document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaSummary {
    pub module: ModuleName,
    pub schema_id: String,
    pub title: String,
    pub description: String,
    /// `properties.protocol_version.const`, falling back to its `default`.
    pub protocol_version: Option<String>,
    /// Root property names in document order.
    pub properties: Vec<String>,
    /// Root `required` entries.
    pub required: Vec<String>,
    /// Names under `$defs`.
    pub definitions: Vec<String>,
    /// Number of schema objects anywhere in the document that carry `enum`.
    pub enum_count: usize,
}

impl SchemaSummary {
    /// Summarise `schema`. Missing fields produce empty values, never errors.
    #[must_use]
    pub fn from_schema(module: ModuleName, schema: &Value) -> Self {
        let mut enum_count = 0usize;
        walk_schema(schema, &mut |obj, _| {
            if obj.contains_key("enum") {
                enum_count += 1;
            }
        });

        Self {
            module,
            schema_id: str_field(schema, "$id"),
            title: str_field(schema, "title"),
            description: str_field(schema, "description"),
            protocol_version: protocol_version(schema).map(str::to_string),
            properties: object_keys(schema.get("properties")),
            required: string_array(schema.get("required")),
            definitions: object_keys(schema.get("$defs")),
            enum_count,
        }
    }

    /// Whether `field` is a root property.
    #[must_use]
    pub fn has_property(&self, field: &str) -> bool {
        self.properties.iter().any(|p| p == field)
    }

    /// Whether `field` is required at the root.
    #[must_use]
    pub fn is_required(&self, field: &str) -> bool {
        self.required.iter().any(|r| r == field)
    }
}

/// Protocol version declared by a schema document.
pub(crate) fn protocol_version(schema: &Value) -> Option<&str> {
    let pv = schema.get("properties")?.get("protocol_version")?;
    pv.get("const")
        .and_then(Value::as_str)
        .or_else(|| pv.get("default").and_then(Value::as_str))
}

fn str_field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

pub(crate) fn object_keys(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_object)
        .map(|obj| obj.keys().cloned().collect())
        .unwrap_or_default()
}

pub(crate) fn string_array(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

// =============================================================================
// TESTS
// =============================================================================
