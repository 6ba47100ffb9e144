//! # mplp-catalog
//!
//! The static schema catalog of the MPLP multi-agent protocol.
//!
//! This crate ships one JSON Schema document per protocol module, classifies
//! the modules into maturity tiers, and provides the pure tooling around
//! those documents: summaries, convention lint, version compatibility checks
//! and deterministic checksums.
//!
//! ## Architectural Constraints
//!
//! - Documents are compiled into the crate and never loaded at runtime
//! - Everything is synchronous and side-effect free
//! - No async, no network dependencies, no logging (pure Rust)
//! - Documents describe records; nothing here validates record instances

// =============================================================================
// MODULES
// =============================================================================

pub mod compat;
pub mod digest;
pub mod lint;
pub mod primitives;
pub mod schema;
pub mod summary;
pub mod tier;
pub mod types;

mod walk;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{CORE_MODULE_NAMES, CatalogError, ModuleName};

// =============================================================================
// RE-EXPORTS: Tiers
// =============================================================================

pub use tier::{
    ENTERPRISE_STANDARD_MODULES, ModuleStatus, PENDING_MODULES, PRODUCTION_READY_MODULES, Tier,
    TierClassifier, TierCounts, is_enterprise_standard, is_pending, is_production_ready,
    module_status, tier_counts,
};

// =============================================================================
// RE-EXPORTS: Schemas
// =============================================================================

pub use schema::{
    COLLAB_SCHEMA, CONFIRM_SCHEMA, CONTEXT_SCHEMA, CORE_SCHEMA, DIALOG_SCHEMA, EXTENSION_SCHEMA,
    NETWORK_SCHEMA, PLAN_SCHEMA, ROLE_SCHEMA, SchemaCatalog, TRACE_SCHEMA, schema_source,
};
pub use summary::SchemaSummary;

// =============================================================================
// RE-EXPORTS: Tooling
// =============================================================================

pub use compat::{
    ChangeKind, CompatibilityReport, SchemaChange, check_compatibility, compare_versions,
    is_valid_version,
};
#[cfg(feature = "crypto-hash")]
pub use digest::{catalog_crypto_hash, verify_catalog_hash};
pub use digest::{canonical_json, catalog_checksum, schema_checksum};
pub use lint::{
    CatalogLintReport, LintFinding, LintReport, LintRule, Severity, lint_catalog, lint_schema,
};

// =============================================================================
// RE-EXPORTS: Primitives
// =============================================================================

pub use primitives::{MAX_SCHEMA_BYTES, PROTOCOL_VERSION, SCHEMA_DRAFT, SCHEMA_ID_PREFIX};
