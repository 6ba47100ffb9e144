//! Structural traversal of JSON Schema documents.
//!
//! Only positions that hold subschemas are visited. Data-valued keywords
//! (`enum`, `const`, `default`, `examples`) are never entered, and the keys of
//! `properties`-like maps are treated as names, not keywords.

use crate::primitives::MAX_WALK_DEPTH;
use serde_json::{Map, Value};

/// Keywords whose value maps names to subschemas.
///
/// `dependencies` entries may also be arrays of property names; those are
/// not objects and are skipped.
const SCHEMA_MAP_KEYWORDS: [&str; 5] = [
    "properties",
    "$defs",
    "definitions",
    "patternProperties",
    "dependencies",
];

/// Keywords whose value is a single subschema.
const SCHEMA_KEYWORDS: [&str; 9] = [
    "items",
    "additionalItems",
    "additionalProperties",
    "contains",
    "propertyNames",
    "not",
    "if",
    "then",
    "else",
];

/// Keywords whose value is an array of subschemas.
const SCHEMA_LIST_KEYWORDS: [&str; 4] = ["allOf", "anyOf", "oneOf", "items"];

/// Visit every schema object in `root`, depth first in document order.
///
/// The visitor receives the object and its JSON Pointer fragment
/// (`#`, `#/properties/status`, ...). Subtrees deeper than
/// [`MAX_WALK_DEPTH`] are skipped.
pub(crate) fn walk_schema<'a, F>(root: &'a Value, visit: &mut F)
where
    F: FnMut(&'a Map<String, Value>, &str),
{
    walk(root, "#", 0, visit);
}

fn walk<'a, F>(node: &'a Value, path: &str, depth: usize, visit: &mut F)
where
    F: FnMut(&'a Map<String, Value>, &str),
{
    if depth > MAX_WALK_DEPTH {
        return;
    }
    let Some(obj) = node.as_object() else {
        return;
    };
    visit(obj, path);

    for (key, value) in obj {
        let key = key.as_str();
        if SCHEMA_MAP_KEYWORDS.contains(&key) {
            if let Some(entries) = value.as_object() {
                let base = child_path(path, key);
                for (name, sub) in entries {
                    walk(sub, &child_path(&base, name), depth + 1, visit);
                }
            }
        } else if SCHEMA_LIST_KEYWORDS.contains(&key) && value.is_array() {
            if let Some(items) = value.as_array() {
                let base = child_path(path, key);
                for (i, sub) in items.iter().enumerate() {
                    walk(sub, &child_path(&base, &i.to_string()), depth + 1, visit);
                }
            }
        } else if SCHEMA_KEYWORDS.contains(&key) {
            walk(value, &child_path(path, key), depth + 1, visit);
        }
    }
}

/// Append one JSON Pointer segment, escaping `~` and `/`.
pub(crate) fn child_path(path: &str, segment: &str) -> String {
    let escaped = segment.replace('~', "~0").replace('/', "~1");
    format!("{path}/{escaped}")
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use serde_json::json;

    fn paths(doc: &Value) -> Vec<String> {
        let mut out = Vec::new();
        walk_schema(doc, &mut |_, path| out.push(path.to_string()));
        out
    }

    #[test]
    fn visits_nested_subschemas() {
        let doc = json!({
            "type": "object",
            "properties": {
                "tasks": {
                    "type": "array",
                    "items": { "type": "object", "properties": { "id": { "type": "string" } } }
                }
            },
            "$defs": { "uuid": { "type": "string" } },
            "oneOf": [ { "required": ["tasks"] } ]
        });
        assert_eq!(
            paths(&doc),
            vec![
                "#",
                "#/properties/tasks",
                "#/properties/tasks/items",
                "#/properties/tasks/items/properties/id",
                "#/$defs/uuid",
                "#/oneOf/0",
            ]
        );
    }

    #[test]
    fn visits_schema_dependencies_only() {
        let doc = json!({
            "dependencies": {
                "billing": ["address"],
                "card": { "properties": { "cvv": { "type": "string" } } }
            }
        });
        assert_eq!(
            paths(&doc),
            vec!["#", "#/dependencies/card", "#/dependencies/card/properties/cvv"]
        );
    }

    #[test]
    fn skips_data_keywords() {
        let doc = json!({
            "enum": [ { "type": "object" } ],
            "const": { "properties": { "x": {} } },
            "default": { "type": "string" }
        });
        assert_eq!(paths(&doc), vec!["#"]);
    }

    #[test]
    fn escapes_pointer_segments() {
        assert_eq!(child_path("#", "a/b~c"), "#/a~1b~0c");
    }

    #[test]
    fn depth_is_bounded() {
        let mut doc = json!({ "type": "string" });
        for _ in 0..(MAX_WALK_DEPTH + 10) {
            doc = json!({ "not": doc });
        }
        assert_eq!(paths(&doc).len(), MAX_WALK_DEPTH + 1);
    }
}
