//! # API Request/Response Types
//!
//! This module defines the JSON structures for the HTTP API.

use mplp_catalog::{
    CatalogLintReport, CompatibilityReport, ModuleName, ModuleStatus, SchemaSummary, Tier,
    TierCounts, is_enterprise_standard, is_pending, is_production_ready, module_status,
};
use serde::{Deserialize, Serialize};

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// =============================================================================
// ERROR RESPONSE
// =============================================================================

/// Body of every 4xx/5xx response produced by a handler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { error: msg.into() }
    }
}

// =============================================================================
// MODULE LISTING
// =============================================================================

/// One module in the listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleEntry {
    pub name: ModuleName,
    pub status: ModuleStatus,
    pub schema_id: String,
}

/// Module listing response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleListResponse {
    pub modules: Vec<ModuleEntry>,
    pub counts: TierCounts,
}

/// Single module response: status plus schema summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleResponse {
    pub name: ModuleName,
    pub status: ModuleStatus,
    pub summary: SchemaSummary,
}

// =============================================================================
// STATUS RESPONSE
// =============================================================================

/// Status lookup for an arbitrary name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub name: String,
    pub status: ModuleStatus,
    pub production_ready: bool,
    pub enterprise_standard: bool,
    pub pending: bool,
}

impl StatusResponse {
    /// Classify `name`. Never fails; unknown names report `unknown`.
    #[must_use]
    pub fn for_name(name: &str) -> Self {
        Self {
            name: name.to_string(),
            status: module_status(name),
            production_ready: is_production_ready(name),
            enterprise_standard: is_enterprise_standard(name),
            pending: is_pending(name),
        }
    }
}

// =============================================================================
// TIERS RESPONSE
// =============================================================================

/// One tier with its modules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierEntry {
    pub tier: Tier,
    pub name: String,
    pub modules: Vec<ModuleName>,
}

impl From<Tier> for TierEntry {
    fn from(tier: Tier) -> Self {
        Self {
            tier,
            name: tier.name().to_string(),
            modules: tier.modules().to_vec(),
        }
    }
}

/// All tiers in priority order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TiersResponse {
    pub tiers: Vec<TierEntry>,
}

// =============================================================================
// CHECK RESPONSE
// =============================================================================

/// Catalog lint response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResponse {
    pub passed: bool,
    pub errors: usize,
    pub warnings: usize,
    pub report: CatalogLintReport,
}

impl From<CatalogLintReport> for CheckResponse {
    fn from(report: CatalogLintReport) -> Self {
        Self {
            passed: report.passed(),
            errors: report.error_count(),
            warnings: report.warning_count(),
            report,
        }
    }
}

// =============================================================================
// COMPAT RESPONSE
// =============================================================================

/// Result of comparing a submitted schema against the embedded one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompatResponse {
    pub module: ModuleName,
    pub compatible: bool,
    pub report: CompatibilityReport,
}

// =============================================================================
// DIGEST RESPONSE
// =============================================================================

/// Catalog fingerprint response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DigestResponse {
    pub modules: usize,
    pub checksum: u64,
    /// `checksum` as 16 lowercase hex digits, safe for JSON number parsers
    /// that lose precision above 2^53.
    pub checksum_hex: String,
    pub algorithm: String,
    pub hash: String,
}
