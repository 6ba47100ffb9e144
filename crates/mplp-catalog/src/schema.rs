//! # Schema Catalog
//!
//! One JSON Schema document per protocol module, compiled into the crate
//! with `include_str!` and parsed once into a [`SchemaCatalog`].
//!
//! The raw text of each document is also exposed as a named constant
//! (`CONTEXT_SCHEMA`, `PLAN_SCHEMA`, ...) for callers that want to hand the
//! bytes on unchanged.

use crate::tier::Tier;
use crate::types::{CatalogError, ModuleName};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::OnceLock;

// =============================================================================
// EMBEDDED DOCUMENTS
// =============================================================================

macro_rules! embedded_schemas {
    ($($module:ident => $file:literal => $const_name:ident),* $(,)?) => {
        $(
            #[doc = concat!("Raw text of `schemas/", $file, "`.")]
            pub const $const_name: &str = include_str!(concat!("../schemas/", $file));
        )*

        /// Raw embedded text of a module's schema document.
        #[must_use]
        pub const fn schema_source(module: ModuleName) -> &'static str {
            match module {
                $( ModuleName::$module => $const_name, )*
            }
        }
    };
}

embedded_schemas! {
    Context => "mplp-context.json" => CONTEXT_SCHEMA,
    Plan => "mplp-plan.json" => PLAN_SCHEMA,
    Confirm => "mplp-confirm.json" => CONFIRM_SCHEMA,
    Trace => "mplp-trace.json" => TRACE_SCHEMA,
    Role => "mplp-role.json" => ROLE_SCHEMA,
    Extension => "mplp-extension.json" => EXTENSION_SCHEMA,
    Core => "mplp-core.json" => CORE_SCHEMA,
    Collab => "mplp-collab.json" => COLLAB_SCHEMA,
    Dialog => "mplp-dialog.json" => DIALOG_SCHEMA,
    Network => "mplp-network.json" => NETWORK_SCHEMA,
}

// =============================================================================
// SCHEMA CATALOG
// =============================================================================

/// Parsed schema documents keyed by module, iterated in canonical order.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaCatalog {
    schemas: BTreeMap<ModuleName, Value>,
}

static GLOBAL_CATALOG: OnceLock<Result<SchemaCatalog, String>> = OnceLock::new();

impl SchemaCatalog {
    /// Parse every embedded document.
    ///
    /// Fails with [`CatalogError::SchemaParse`] naming the first module whose
    /// document is not valid JSON.
    pub fn load() -> Result<Self, CatalogError> {
        let mut schemas = BTreeMap::new();
        for module in ModuleName::ALL {
            let value: Value = serde_json::from_str(schema_source(module)).map_err(|e| {
                CatalogError::SchemaParse {
                    module: module.to_string(),
                    message: e.to_string(),
                }
            })?;
            schemas.insert(module, value);
        }
        Ok(Self { schemas })
    }

    /// Build a catalog from already parsed documents.
    ///
    /// Modules missing from `schemas` are simply absent from the catalog.
    #[must_use]
    pub fn from_schemas(schemas: BTreeMap<ModuleName, Value>) -> Self {
        Self { schemas }
    }

    /// The process-wide catalog, parsed on first use.
    ///
    /// A parse failure is cached and returned on every call.
    pub fn global() -> Result<&'static SchemaCatalog, CatalogError> {
        match GLOBAL_CATALOG.get_or_init(|| Self::load().map_err(|e| e.to_string())) {
            Ok(catalog) => Ok(catalog),
            Err(message) => Err(CatalogError::SchemaParse {
                module: "catalog".to_string(),
                message: message.clone(),
            }),
        }
    }

    /// Schema of a module.
    #[must_use]
    pub fn get(&self, module: ModuleName) -> Option<&Value> {
        self.schemas.get(&module)
    }

    /// Schema of a module looked up by wire name.
    pub fn get_by_name(&self, name: &str) -> Result<&Value, CatalogError> {
        let module: ModuleName = name.parse()?;
        self.get(module)
            .ok_or_else(|| CatalogError::UnknownModule(name.to_string()))
    }

    /// Module name → schema, in canonical order.
    #[must_use]
    pub fn schema_map(&self) -> Map<String, Value> {
        self.schemas
            .iter()
            .map(|(module, schema)| (module.to_string(), schema.clone()))
            .collect()
    }

    /// Every schema as one flat array, in canonical order.
    #[must_use]
    pub fn all_schemas(&self) -> Vec<&Value> {
        self.schemas.values().collect()
    }

    /// Modules present in the catalog, in canonical order.
    pub fn modules(&self) -> impl Iterator<Item = ModuleName> + '_ {
        self.schemas.keys().copied()
    }

    /// `(module, schema)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (ModuleName, &Value)> + '_ {
        self.schemas.iter().map(|(m, v)| (*m, v))
    }

    /// Schemas of the modules in `tier`, in the tier's table order.
    #[must_use]
    pub fn modules_in(&self, tier: Tier) -> Vec<(ModuleName, &Value)> {
        tier.modules()
            .iter()
            .filter_map(|m| self.get(*m).map(|schema| (*m, schema)))
            .collect()
    }

    /// Number of documents in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Whether the catalog holds no documents.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::types::CORE_MODULE_NAMES;

    #[test]
    fn load_parses_every_module() {
        let catalog = SchemaCatalog::load().unwrap();
        assert_eq!(catalog.len(), CORE_MODULE_NAMES.len());
        for module in CORE_MODULE_NAMES {
            assert!(catalog.get(module).is_some(), "{module} missing");
        }
    }

    #[test]
    fn global_is_shared() {
        let a = SchemaCatalog::global().unwrap();
        let b = SchemaCatalog::global().unwrap();
        assert!(std::ptr::eq(a, b));
    }

    #[test]
    fn get_by_name_unknown() {
        let catalog = SchemaCatalog::load().unwrap();
        assert!(matches!(
            catalog.get_by_name("workflow"),
            Err(CatalogError::UnknownModule(name)) if name == "workflow"
        ));
        assert!(catalog.get_by_name("trace").is_ok());
    }

    #[test]
    fn get_by_name_missing_from_partial_catalog() {
        let full = SchemaCatalog::load().unwrap();
        let mut schemas = BTreeMap::new();
        schemas.insert(ModuleName::Plan, full.get(ModuleName::Plan).unwrap().clone());
        let partial = SchemaCatalog::from_schemas(schemas);

        assert!(partial.get_by_name("plan").is_ok());
        assert!(matches!(
            partial.get_by_name("context"),
            Err(CatalogError::UnknownModule(_))
        ));
    }

    #[test]
    fn schema_map_keys_in_canonical_order() {
        let catalog = SchemaCatalog::load().unwrap();
        let keys: Vec<String> = catalog.schema_map().keys().cloned().collect();
        let expected: Vec<String> = CORE_MODULE_NAMES.iter().map(|m| m.to_string()).collect();
        assert_eq!(keys, expected);
    }

    #[test]
    fn all_schemas_flattened_in_order() {
        let catalog = SchemaCatalog::load().unwrap();
        let all = catalog.all_schemas();
        assert_eq!(all.len(), 10);
        assert_eq!(
            all[0]["$id"],
            "https://mplp.dev/schemas/v1.0/mplp-context.json"
        );
        assert_eq!(
            all[9]["$id"],
            "https://mplp.dev/schemas/v1.0/mplp-network.json"
        );
    }

    #[test]
    fn modules_in_tier() {
        let catalog = SchemaCatalog::load().unwrap();
        let pending: Vec<ModuleName> = catalog
            .modules_in(Tier::Pending)
            .into_iter()
            .map(|(m, _)| m)
            .collect();
        assert_eq!(
            pending,
            vec![ModuleName::Collab, ModuleName::Dialog, ModuleName::Network]
        );
    }

    #[test]
    fn source_constants_match_modules() {
        assert_eq!(schema_source(ModuleName::Context), CONTEXT_SCHEMA);
        assert_eq!(schema_source(ModuleName::Network), NETWORK_SCHEMA);
        assert!(CORE_SCHEMA.contains("mplp-core.json"));
    }
}
