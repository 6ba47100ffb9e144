//! # Schema Lint
//!
//! Checks a schema document against the catalog conventions: draft-07
//! dialect, versioned `$id`, the protocol version property, shared `uuid`
//! definition, declared `required` entries and snake_case naming.
//!
//! Keyword values are checked against the draft-07 meta-schema. The
//! meta-schema predates `$defs`, so each `$defs` entry is checked on its own.
//!
//! Lint inspects the documents themselves. It never validates record
//! instances against them.
//!
//! ## Rules
//!
//! | Code | Severity |
//! |------|----------|
//! | `ROOT_NOT_OBJECT` | error |
//! | `MISSING_ROOT_FIELD` | error |
//! | `WRONG_DRAFT` | error |
//! | `DRAFT07_INVALID` | error |
//! | `BAD_SCHEMA_ID` | error |
//! | `MISSING_PROPERTIES` | error |
//! | `MISSING_PROTOCOL_VERSION` | error |
//! | `MISSING_DEFS` | error |
//! | `MISSING_UUID_DEF` | error |
//! | `UNDECLARED_REQUIRED` | error |
//! | `CAMEL_CASE_FIELD` | warning |
//! | `EMPTY_DESCRIPTION` | warning |

use crate::primitives::{REQUIRED_ROOT_FIELDS, SCHEMA_DRAFT, SCHEMA_ID_PREFIX};
use crate::schema::SchemaCatalog;
use crate::summary::{object_keys, string_array};
use crate::walk::{child_path, walk_schema};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// =============================================================================
// SEVERITY & RULES
// =============================================================================

/// Severity of a lint finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        })
    }
}

/// A lint rule, serialized as its stable code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LintRule {
    RootNotObject,
    MissingRootField,
    WrongDraft,
    #[serde(rename = "DRAFT07_INVALID")]
    Draft07Invalid,
    BadSchemaId,
    MissingProperties,
    MissingProtocolVersion,
    MissingDefs,
    MissingUuidDef,
    UndeclaredRequired,
    CamelCaseField,
    EmptyDescription,
}

impl LintRule {
    /// Stable rule code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            LintRule::RootNotObject => "ROOT_NOT_OBJECT",
            LintRule::MissingRootField => "MISSING_ROOT_FIELD",
            LintRule::WrongDraft => "WRONG_DRAFT",
            LintRule::Draft07Invalid => "DRAFT07_INVALID",
            LintRule::BadSchemaId => "BAD_SCHEMA_ID",
            LintRule::MissingProperties => "MISSING_PROPERTIES",
            LintRule::MissingProtocolVersion => "MISSING_PROTOCOL_VERSION",
            LintRule::MissingDefs => "MISSING_DEFS",
            LintRule::MissingUuidDef => "MISSING_UUID_DEF",
            LintRule::UndeclaredRequired => "UNDECLARED_REQUIRED",
            LintRule::CamelCaseField => "CAMEL_CASE_FIELD",
            LintRule::EmptyDescription => "EMPTY_DESCRIPTION",
        }
    }

    /// Severity this rule reports at.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        match self {
            LintRule::CamelCaseField | LintRule::EmptyDescription => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

impl std::fmt::Display for LintRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

// =============================================================================
// FINDINGS & REPORTS
// =============================================================================

/// One convention violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LintFinding {
    pub code: LintRule,
    pub severity: Severity,
    /// JSON Pointer fragment of the offending location.
    pub path: String,
    pub message: String,
}

impl LintFinding {
    fn new(code: LintRule, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code,
            severity: code.severity(),
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Findings for one schema document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LintReport {
    pub schema: String,
    pub findings: Vec<LintFinding>,
}

impl LintReport {
    /// No error-level findings. Warnings do not fail a report.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.error_count() == 0
    }

    #[must_use]
    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    /// Whether any finding carries `code`.
    #[must_use]
    pub fn has(&self, code: LintRule) -> bool {
        self.findings.iter().any(|f| f.code == code)
    }

    fn count(&self, severity: Severity) -> usize {
        self.findings
            .iter()
            .filter(|f| f.severity == severity)
            .count()
    }
}

/// Findings for a whole catalog, one report per module in canonical order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogLintReport {
    pub reports: Vec<LintReport>,
}

impl CatalogLintReport {
    #[must_use]
    pub fn passed(&self) -> bool {
        self.reports.iter().all(LintReport::passed)
    }

    #[must_use]
    pub fn error_count(&self) -> usize {
        self.reports.iter().map(LintReport::error_count).sum()
    }

    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.reports.iter().map(LintReport::warning_count).sum()
    }
}

// =============================================================================
// LINT
// =============================================================================

/// Lint one schema document.
#[must_use]
pub fn lint_schema(name: &str, schema: &Value) -> LintReport {
    let mut findings = Vec::new();

    let Some(root) = schema.as_object() else {
        findings.push(LintFinding::new(
            LintRule::RootNotObject,
            "#",
            "schema document must be a JSON object",
        ));
        return LintReport {
            schema: name.to_string(),
            findings,
        };
    };

    // Root fields
    for field in REQUIRED_ROOT_FIELDS {
        if !root.contains_key(field) {
            findings.push(LintFinding::new(
                LintRule::MissingRootField,
                "#",
                format!("missing root field `{field}`"),
            ));
        }
    }

    if root
        .get("$schema")
        .is_some_and(|draft| draft.as_str() != Some(SCHEMA_DRAFT))
    {
        findings.push(LintFinding::new(
            LintRule::WrongDraft,
            "#/$schema",
            format!("`$schema` must be `{SCHEMA_DRAFT}`"),
        ));
    }

    if root
        .get("$id")
        .is_some_and(|id| !id.as_str().is_some_and(|s| s.starts_with(SCHEMA_ID_PREFIX)))
    {
        findings.push(LintFinding::new(
            LintRule::BadSchemaId,
            "#/$id",
            format!("`$id` must start with `{SCHEMA_ID_PREFIX}`"),
        ));
    }

    if let Err(message) = meta_check(schema) {
        findings.push(LintFinding::new(
            LintRule::Draft07Invalid,
            "#",
            format!("not a valid draft-07 schema: {message}"),
        ));
    }

    match root.get("properties").and_then(Value::as_object) {
        None => findings.push(LintFinding::new(
            LintRule::MissingProperties,
            "#",
            "`properties` must be an object",
        )),
        Some(props) if !props.contains_key("protocol_version") => {
            findings.push(LintFinding::new(
                LintRule::MissingProtocolVersion,
                "#/properties",
                "`properties.protocol_version` is not declared",
            ));
        }
        Some(_) => {}
    }

    match root.get("$defs").and_then(Value::as_object) {
        None => findings.push(LintFinding::new(
            LintRule::MissingDefs,
            "#",
            "`$defs` must be an object",
        )),
        Some(defs) if !defs.contains_key("uuid") => {
            findings.push(LintFinding::new(
                LintRule::MissingUuidDef,
                "#/$defs",
                "`$defs.uuid` is not defined",
            ));
        }
        Some(_) => {}
    }

    // Nested structure, in document order
    walk_schema(schema, &mut |obj, path| {
        if is_defs_entry(path) {
            if let Err(message) = meta_check(&Value::Object(obj.clone())) {
                findings.push(LintFinding::new(
                    LintRule::Draft07Invalid,
                    path,
                    format!("definition is not a valid draft-07 schema: {message}"),
                ));
            }
        }

        if let Some(props) = obj.get("properties").and_then(Value::as_object) {
            for field in string_array(obj.get("required")) {
                if !props.contains_key(&field) {
                    findings.push(LintFinding::new(
                        LintRule::UndeclaredRequired,
                        child_path(path, "required"),
                        format!("required field `{field}` is not declared in `properties`"),
                    ));
                }
            }
        }

        for keyword in ["properties", "$defs", "definitions"] {
            let base = child_path(path, keyword);
            for key in object_keys(obj.get(keyword)) {
                if is_camel_case(&key) {
                    findings.push(LintFinding::new(
                        LintRule::CamelCaseField,
                        child_path(&base, &key),
                        format!("field `{key}` should use snake_case instead of camelCase"),
                    ));
                }
            }
        }
    });

    if root
        .get("description")
        .is_some_and(|d| d.as_str().is_none_or(|d| d.trim().is_empty()))
    {
        findings.push(LintFinding::new(
            LintRule::EmptyDescription,
            "#/description",
            "root `description` should be a meaningful string",
        ));
    }

    LintReport {
        schema: name.to_string(),
        findings,
    }
}

/// Lint every document in `catalog`.
#[must_use]
pub fn lint_catalog(catalog: &SchemaCatalog) -> CatalogLintReport {
    CatalogLintReport {
        reports: catalog
            .iter()
            .map(|(module, schema)| lint_schema(module.as_str(), schema))
            .collect(),
    }
}

/// Validate `schema` against the draft-07 meta-schema.
fn meta_check(schema: &Value) -> Result<(), String> {
    jsonschema::draft7::meta::validate(schema).map_err(|e| e.to_string())
}

/// Whether `path` points directly at an entry of a `$defs` map.
fn is_defs_entry(path: &str) -> bool {
    path.rsplit_once('/')
        .is_some_and(|(parent, _)| parent.ends_with("/$defs"))
}

/// Lower-camel identifiers such as `contextId`.
///
/// Names containing `_`, all-lowercase names and names starting with `$`
/// or an uppercase letter are not camelCase.
fn is_camel_case(name: &str) -> bool {
    if name.contains('_') || name.starts_with('$') {
        return false;
    }
    let mut chars = name.chars();
    let starts_lower = chars.next().is_some_and(|c| c.is_ascii_lowercase());
    starts_lower
        && name.chars().all(|c| c.is_ascii_alphanumeric())
        && name.chars().any(|c| c.is_ascii_uppercase())
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use serde_json::json;

    fn minimal() -> Value {
        json!({
            "$schema": SCHEMA_DRAFT,
            "$id": "https://mplp.dev/schemas/v1.0/mplp-test.json",
            "title": "Test",
            "description": "Test schema",
            "type": "object",
            "$defs": { "uuid": { "type": "string" } },
            "properties": {
                "protocol_version": { "type": "string", "const": "1.0.0" },
                "test_id": { "$ref": "#/$defs/uuid" }
            },
            "required": ["protocol_version", "test_id"]
        })
    }

    #[test]
    fn minimal_schema_is_clean() {
        let report = lint_schema("test", &minimal());
        assert!(report.findings.is_empty(), "{:?}", report.findings);
        assert!(report.passed());
    }

    #[test]
    fn non_object_root_stops_early() {
        let report = lint_schema("test", &json!([1, 2]));
        assert_eq!(report.findings.len(), 1);
        assert!(report.has(LintRule::RootNotObject));
        assert!(!report.passed());
    }

    #[test]
    fn missing_root_fields_reported_each() {
        let report = lint_schema("test", &json!({ "type": "object" }));
        let missing = report
            .findings
            .iter()
            .filter(|f| f.code == LintRule::MissingRootField)
            .count();
        assert_eq!(missing, 4);
        assert!(report.has(LintRule::MissingProperties));
        assert!(report.has(LintRule::MissingDefs));
        assert!(!report.has(LintRule::MissingProtocolVersion));
    }

    #[test]
    fn wrong_draft_and_id() {
        let mut doc = minimal();
        doc["$schema"] = json!("https://json-schema.org/draft/2020-12/schema");
        doc["$id"] = json!("https://example.com/test.json");
        let report = lint_schema("test", &doc);
        assert!(report.has(LintRule::WrongDraft));
        assert!(report.has(LintRule::BadSchemaId));
    }

    #[test]
    fn missing_protocol_version_and_uuid() {
        let mut doc = minimal();
        doc["properties"].as_object_mut().unwrap().remove("protocol_version");
        doc["required"] = json!(["test_id"]);
        doc["$defs"] = json!({ "timestamp": { "type": "string" } });
        let report = lint_schema("test", &doc);
        assert!(report.has(LintRule::MissingProtocolVersion));
        assert!(report.has(LintRule::MissingUuidDef));
        assert!(!report.has(LintRule::MissingDefs));
    }

    #[test]
    fn undeclared_required_at_nested_level() {
        let mut doc = minimal();
        doc["properties"]["nested"] = json!({
            "type": "object",
            "properties": { "a": { "type": "string" } },
            "required": ["a", "b"]
        });
        let report = lint_schema("test", &doc);
        let finding = report
            .findings
            .iter()
            .find(|f| f.code == LintRule::UndeclaredRequired)
            .unwrap();
        assert_eq!(finding.path, "#/properties/nested/required");
        assert!(finding.message.contains("`b`"));
    }

    #[test]
    fn dependency_subschemas_are_linted() {
        let mut doc = minimal();
        doc["dependencies"] = json!({
            "test_id": {
                "properties": { "parentId": { "type": "string" } },
                "required": ["parentId", "missing"]
            },
            "protocol_version": ["test_id"]
        });
        let report = lint_schema("test", &doc);
        let paths: Vec<&str> = report.findings.iter().map(|f| f.path.as_str()).collect();
        assert!(paths.contains(&"#/dependencies/test_id/required"));
        assert!(paths.contains(&"#/dependencies/test_id/properties/parentId"));
        assert!(report.has(LintRule::UndeclaredRequired));
        assert!(report.has(LintRule::CamelCaseField));
    }

    #[test]
    fn required_without_properties_is_not_checked() {
        let mut doc = minimal();
        doc["oneOf"] = json!([{ "required": ["test_id"] }]);
        assert!(lint_schema("test", &doc).passed());
    }

    #[test]
    fn camel_case_is_a_warning() {
        let mut doc = minimal();
        doc["properties"]["contextId"] = json!({ "type": "string" });
        let report = lint_schema("test", &doc);
        assert!(report.has(LintRule::CamelCaseField));
        assert_eq!(report.warning_count(), 1);
        assert!(report.passed());
    }

    #[test]
    fn enum_values_are_not_field_names() {
        let mut doc = minimal();
        doc["properties"]["kind"] = json!({ "enum": ["fooBar"], "default": { "someKey": 1 } });
        assert!(lint_schema("test", &doc).findings.is_empty());
    }

    #[test]
    fn empty_description_warns() {
        let mut doc = minimal();
        doc["description"] = json!("   ");
        let report = lint_schema("test", &doc);
        assert!(report.has(LintRule::EmptyDescription));
        assert!(report.passed());
    }

    #[test]
    fn non_string_description_warns() {
        let mut doc = minimal();
        doc["description"] = json!(42);
        let report = lint_schema("test", &doc);
        assert!(report.has(LintRule::EmptyDescription));
        assert!(report.has(LintRule::Draft07Invalid));
    }

    #[test]
    fn unknown_type_name_is_invalid_draft07() {
        let mut doc = minimal();
        doc["type"] = json!("objekt");
        let report = lint_schema("test", &doc);
        assert!(report.has(LintRule::Draft07Invalid));
        assert!(!report.passed());
    }

    #[test]
    fn string_valued_required_is_invalid_draft07() {
        let mut doc = minimal();
        doc["required"] = json!("protocol_version");
        let report = lint_schema("test", &doc);
        let finding = report
            .findings
            .iter()
            .find(|f| f.code == LintRule::Draft07Invalid)
            .unwrap();
        assert_eq!(finding.path, "#");
        assert_eq!(finding.severity, Severity::Error);
    }

    #[test]
    fn bad_keyword_value_in_nested_property() {
        let mut doc = minimal();
        doc["properties"]["name"] = json!({ "type": "string", "minLength": "ten" });
        assert!(lint_schema("test", &doc).has(LintRule::Draft07Invalid));
    }

    #[test]
    fn invalid_defs_entry_reported_at_its_path() {
        let mut doc = minimal();
        doc["$defs"]["uuid"] = json!({ "type": "strng" });
        let report = lint_schema("test", &doc);
        let finding = report
            .findings
            .iter()
            .find(|f| f.code == LintRule::Draft07Invalid)
            .unwrap();
        assert_eq!(finding.path, "#/$defs/uuid");
    }

    #[test]
    fn malformed_document_with_required_keys_fails() {
        let doc = json!({
            "$schema": SCHEMA_DRAFT,
            "$id": "https://mplp.dev/schemas/v1.0/mplp-x.json",
            "title": 7,
            "description": 42,
            "type": "objekt",
            "$defs": { "uuid": { "type": "strng" } },
            "properties": { "protocol_version": 5, "x": { "minLength": "ten" } },
            "required": "protocol_version"
        });
        let report = lint_schema("x", &doc);
        assert!(!report.passed());
        assert!(report.error_count() >= 2);
        assert!(report.has(LintRule::EmptyDescription));
    }

    #[test]
    fn defs_entry_detection() {
        assert!(is_defs_entry("#/$defs/uuid"));
        assert!(is_defs_entry("#/properties/a/$defs/b"));
        assert!(!is_defs_entry("#/$defs"));
        assert!(!is_defs_entry("#/properties/uuid"));
        assert!(!is_defs_entry("#"));
    }

    #[test]
    fn camel_case_detection() {
        assert!(is_camel_case("contextId"));
        assert!(is_camel_case("a1B"));
        assert!(!is_camel_case("context_id"));
        assert!(!is_camel_case("context"));
        assert!(!is_camel_case("ContextId"));
        assert!(!is_camel_case("$defs"));
        assert!(!is_camel_case("x-Custom"));
    }

    #[test]
    fn rule_codes_serialize_as_codes() {
        for rule in [LintRule::UndeclaredRequired, LintRule::CamelCaseField] {
            let json = serde_json::to_string(&rule).unwrap();
            assert_eq!(json, format!("\"{}\"", rule.code()));
        }
    }

    #[test]
    fn embedded_catalog_lints_clean() {
        let catalog = SchemaCatalog::load().unwrap();
        let report = lint_catalog(&catalog);
        assert_eq!(report.reports.len(), 10);
        assert_eq!(report.error_count(), 0, "{:#?}", report);
        assert_eq!(report.warning_count(), 0);
    }
}
