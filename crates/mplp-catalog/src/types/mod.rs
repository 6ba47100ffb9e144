//! # Core Type Definitions
//!
//! This module contains the core types of the MPLP schema catalog:
//! - Protocol module identifiers (`ModuleName`, `CORE_MODULE_NAMES`)
//! - Error types (`CatalogError`)
//!
//! ## Ordering Guarantees
//!
//! `ModuleName` implements `Ord` in canonical protocol order
//! (context, plan, confirm, trace, role, extension, core, collab, dialog,
//! network), so every `BTreeMap` keyed by module iterates the same way.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// =============================================================================
// MODULE NAME
// =============================================================================

/// One named protocol domain with its own JSON Schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleName {
    Context,
    Plan,
    Confirm,
    Trace,
    Role,
    Extension,
    Core,
    Collab,
    Dialog,
    Network,
}

/// Every protocol module, in canonical order.
pub const CORE_MODULE_NAMES: [ModuleName; 10] = [
    ModuleName::Context,
    ModuleName::Plan,
    ModuleName::Confirm,
    ModuleName::Trace,
    ModuleName::Role,
    ModuleName::Extension,
    ModuleName::Core,
    ModuleName::Collab,
    ModuleName::Dialog,
    ModuleName::Network,
];

impl ModuleName {
    /// All modules in canonical order.
    pub const ALL: [ModuleName; 10] = CORE_MODULE_NAMES;

    /// The lower-case wire name of the module.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ModuleName::Context => "context",
            ModuleName::Plan => "plan",
            ModuleName::Confirm => "confirm",
            ModuleName::Trace => "trace",
            ModuleName::Role => "role",
            ModuleName::Extension => "extension",
            ModuleName::Core => "core",
            ModuleName::Collab => "collab",
            ModuleName::Dialog => "dialog",
            ModuleName::Network => "network",
        }
    }

    /// File name of the module's schema document (`mplp-<module>.json`).
    #[must_use]
    pub fn schema_file_name(&self) -> String {
        format!("mplp-{}.json", self.as_str())
    }

    /// Look up a module by its exact wire name.
    ///
    /// Returns `None` for anything that is not one of the ten names,
    /// including differently-cased spellings.
    #[must_use]
    pub fn from_name(name: &str) -> Option<ModuleName> {
        Self::ALL.iter().copied().find(|m| m.as_str() == name)
    }
}

impl fmt::Display for ModuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModuleName {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| CatalogError::UnknownModule(s.to_string()))
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the MPLP catalog.
///
/// - No silent failures
/// - Use `Result<T, CatalogError>` for fallible operations
/// - The catalog never panics; all errors are recoverable
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The name does not belong to any protocol module.
    #[error("Unknown module: {0}")]
    UnknownModule(String),

    /// An embedded or supplied schema document could not be parsed.
    #[error("Schema parse error in {module}: {message}")]
    SchemaParse { module: String, message: String },

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    IoError(String),

    /// A serialization or deserialization error occurred.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Configuration could not be read or is invalid.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

// =============================================================================
// TESTS
// =============================================================================
