//! # Compatibility Check
//!
//! Compares an older (source) and a newer (target) schema document of the
//! same module and reports changes that can make a record accepted by the
//! source schema rejected by the target.
//!
//! Only the root level is compared: root `type`, `$defs` names, root
//! properties, root `required` and the `enum` values of root properties.

use crate::summary::{object_keys, protocol_version, string_array};
use crate::walk::child_path;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;

// =============================================================================
// CHANGE KINDS
// =============================================================================

/// Kind of a detected schema change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChangeKind {
    /// Source declares a newer protocol version than target.
    VersionRegression,
    TypeMismatch,
    MissingDefinition,
    RemovedProperty,
    NewRequiredField,
    RemovedEnumValue,
}

impl ChangeKind {
    /// Stable change code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            ChangeKind::VersionRegression => "VERSION_REGRESSION",
            ChangeKind::TypeMismatch => "TYPE_MISMATCH",
            ChangeKind::MissingDefinition => "MISSING_DEFINITION",
            ChangeKind::RemovedProperty => "REMOVED_PROPERTY",
            ChangeKind::NewRequiredField => "NEW_REQUIRED_FIELD",
            ChangeKind::RemovedEnumValue => "REMOVED_ENUM_VALUE",
        }
    }

    /// Whether this kind of change breaks existing records.
    #[must_use]
    pub const fn is_breaking(&self) -> bool {
        !matches!(self, ChangeKind::VersionRegression)
    }
}

impl std::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// One detected change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaChange {
    pub kind: ChangeKind,
    pub breaking: bool,
    /// JSON Pointer fragment of the changed location in the source document.
    pub path: String,
    pub message: String,
}

impl SchemaChange {
    fn new(kind: ChangeKind, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            breaking: kind.is_breaking(),
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Result of comparing two schema documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompatibilityReport {
    pub source_version: Option<String>,
    pub target_version: Option<String>,
    pub changes: Vec<SchemaChange>,
}

impl CompatibilityReport {
    /// True when no breaking change was found.
    #[must_use]
    pub fn compatible(&self) -> bool {
        !self.changes.iter().any(|c| c.breaking)
    }

    /// The breaking changes only.
    pub fn breaking_changes(&self) -> impl Iterator<Item = &SchemaChange> {
        self.changes.iter().filter(|c| c.breaking)
    }

    /// Whether any change of `kind` was found.
    #[must_use]
    pub fn has(&self, kind: ChangeKind) -> bool {
        self.changes.iter().any(|c| c.kind == kind)
    }
}

// =============================================================================
// CHECK
// =============================================================================

/// Compare `source` (older) against `target` (newer).
#[must_use]
pub fn check_compatibility(source: &Value, target: &Value) -> CompatibilityReport {
    let source_version = protocol_version(source).map(str::to_string);
    let target_version = protocol_version(target).map(str::to_string);
    let mut changes = Vec::new();

    if let (Some(src), Some(tgt)) = (&source_version, &target_version) {
        if compare_versions(src, tgt) == Ordering::Greater {
            changes.push(SchemaChange::new(
                ChangeKind::VersionRegression,
                "#/properties/protocol_version",
                format!("source version {src} is newer than target version {tgt}"),
            ));
        }
    }

    let source_type = source.get("type");
    let target_type = target.get("type");
    if source_type != target_type {
        changes.push(SchemaChange::new(
            ChangeKind::TypeMismatch,
            "#/type",
            format!(
                "root type changed from {} to {}",
                display_value(source_type),
                display_value(target_type)
            ),
        ));
    }

    let target_defs = object_keys(target.get("$defs"));
    for name in object_keys(source.get("$defs")) {
        if !target_defs.contains(&name) {
            changes.push(SchemaChange::new(
                ChangeKind::MissingDefinition,
                child_path("#/$defs", &name),
                format!("definition `{name}` was removed"),
            ));
        }
    }

    let source_props = source.get("properties").and_then(Value::as_object);
    let target_props = target.get("properties").and_then(Value::as_object);
    if let Some(source_props) = source_props {
        for (name, source_prop) in source_props {
            let Some(target_prop) = target_props.and_then(|p| p.get(name)) else {
                changes.push(SchemaChange::new(
                    ChangeKind::RemovedProperty,
                    child_path("#/properties", name),
                    format!("property `{name}` was removed"),
                ));
                continue;
            };

            let target_enum = target_prop.get("enum").and_then(Value::as_array);
            if let (Some(source_enum), Some(target_enum)) =
                (source_prop.get("enum").and_then(Value::as_array), target_enum)
            {
                for value in source_enum {
                    if !target_enum.contains(value) {
                        changes.push(SchemaChange::new(
                            ChangeKind::RemovedEnumValue,
                            child_path(&child_path("#/properties", name), "enum"),
                            format!("value {value} was removed from `{name}`"),
                        ));
                    }
                }
            }
        }
    }

    let source_required = string_array(source.get("required"));
    for field in string_array(target.get("required")) {
        if !source_required.contains(&field) {
            changes.push(SchemaChange::new(
                ChangeKind::NewRequiredField,
                "#/required",
                format!("field `{field}` is newly required"),
            ));
        }
    }

    CompatibilityReport {
        source_version,
        target_version,
        changes,
    }
}

fn display_value(value: Option<&Value>) -> String {
    value.map_or_else(|| "none".to_string(), Value::to_string)
}

// =============================================================================
// VERSIONS
// =============================================================================

/// Compare dotted numeric versions part by part. Missing or non-numeric
/// parts count as 0, so `1.0` equals `1.0.0`.
#[must_use]
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let parse = |v: &str| -> Vec<u64> { v.split('.').map(|p| p.parse().unwrap_or(0)).collect() };
    let (a, b) = (parse(a), parse(b));
    let len = a.len().max(b.len());
    for i in 0..len {
        let x = a.get(i).copied().unwrap_or(0);
        let y = b.get(i).copied().unwrap_or(0);
        match x.cmp(&y) {
            Ordering::Equal => {}
            other => return other,
        }
    }
    Ordering::Equal
}

/// Whether `version` has the `major.minor.patch` numeric form.
#[must_use]
pub fn is_valid_version(version: &str) -> bool {
    let parts: Vec<&str> = version.split('.').collect();
    parts.len() == 3
        && parts
            .iter()
            .all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()))
}

// =============================================================================
// TESTS
// =============================================================================
