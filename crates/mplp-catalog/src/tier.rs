//! # Maturity Tiers
//!
//! Every protocol module is assigned one of three maturity tiers.
//!
//! | Tier | Tag | Modules |
//! |------|-----|---------|
//! | Production-ready | `production-ready` | context, plan, confirm, trace |
//! | Enterprise-standard | `enterprise-standard` | role, extension, core |
//! | Pending | `pending` | collab, dialog, network |
//!
//! Status lookup tests membership in a fixed priority order
//! (production-ready, enterprise-standard, pending) and falls through to
//! `unknown`. It is total: any string has a status, and no lookup can fail.
//!
//! Tiers are informational. Nothing in the catalog gates access to a
//! schema on its module's tier.

use crate::types::ModuleName;
use serde::{Deserialize, Serialize};

// =============================================================================
// CLASSIFICATION TABLES
// =============================================================================

/// Modules whose schemas are stable and production-ready.
pub const PRODUCTION_READY_MODULES: [ModuleName; 4] = [
    ModuleName::Context,
    ModuleName::Plan,
    ModuleName::Confirm,
    ModuleName::Trace,
];

/// Modules that meet the enterprise standard.
pub const ENTERPRISE_STANDARD_MODULES: [ModuleName; 3] =
    [ModuleName::Role, ModuleName::Extension, ModuleName::Core];

/// Modules still pending promotion.
pub const PENDING_MODULES: [ModuleName; 3] =
    [ModuleName::Collab, ModuleName::Dialog, ModuleName::Network];

// =============================================================================
// TIER ENUM
// =============================================================================

/// Maturity tier of a protocol module, declared in lookup priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tier {
    ProductionReady,
    EnterpriseStandard,
    Pending,
}

impl Tier {
    /// All tiers in lookup priority order.
    pub const ALL: [Tier; 3] = [Tier::ProductionReady, Tier::EnterpriseStandard, Tier::Pending];

    /// The tier's string tag.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Tier::ProductionReady => "production-ready",
            Tier::EnterpriseStandard => "enterprise-standard",
            Tier::Pending => "pending",
        }
    }

    /// Human-readable tier name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Tier::ProductionReady => "Production Ready",
            Tier::EnterpriseStandard => "Enterprise Standard",
            Tier::Pending => "Pending",
        }
    }

    /// The modules classified in this tier.
    #[must_use]
    pub const fn modules(&self) -> &'static [ModuleName] {
        match self {
            Tier::ProductionReady => &PRODUCTION_READY_MODULES,
            Tier::EnterpriseStandard => &ENTERPRISE_STANDARD_MODULES,
            Tier::Pending => &PENDING_MODULES,
        }
    }

    /// Parse a tier from its tag.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Tier> {
        Self::ALL.iter().copied().find(|t| t.as_str() == tag)
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// MODULE STATUS
// =============================================================================

/// Result of a status lookup: a tier, or `unknown` for names outside every
/// classification table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModuleStatus {
    ProductionReady,
    EnterpriseStandard,
    Pending,
    Unknown,
}

impl ModuleStatus {
    /// The status tag.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ModuleStatus::ProductionReady => "production-ready",
            ModuleStatus::EnterpriseStandard => "enterprise-standard",
            ModuleStatus::Pending => "pending",
            ModuleStatus::Unknown => "unknown",
        }
    }

    /// The tier behind this status, if any.
    #[must_use]
    pub const fn tier(&self) -> Option<Tier> {
        match self {
            ModuleStatus::ProductionReady => Some(Tier::ProductionReady),
            ModuleStatus::EnterpriseStandard => Some(Tier::EnterpriseStandard),
            ModuleStatus::Pending => Some(Tier::Pending),
            ModuleStatus::Unknown => None,
        }
    }
}

impl From<Tier> for ModuleStatus {
    fn from(tier: Tier) -> Self {
        match tier {
            Tier::ProductionReady => ModuleStatus::ProductionReady,
            Tier::EnterpriseStandard => ModuleStatus::EnterpriseStandard,
            Tier::Pending => ModuleStatus::Pending,
        }
    }
}

impl std::fmt::Display for ModuleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// TIER CLASSIFIER
// =============================================================================

/// Membership-based tier lookup over three classification tables.
///
/// [`TierClassifier::new`] uses the catalog's static tables. Custom tables
/// are only useful for exercising the lookup order.
#[derive(Debug, Clone, Copy)]
pub struct TierClassifier<'a> {
    production_ready: &'a [ModuleName],
    enterprise_standard: &'a [ModuleName],
    pending: &'a [ModuleName],
}

impl Default for TierClassifier<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl TierClassifier<'static> {
    /// Create a classifier over the catalog's static tables.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            production_ready: &PRODUCTION_READY_MODULES,
            enterprise_standard: &ENTERPRISE_STANDARD_MODULES,
            pending: &PENDING_MODULES,
        }
    }
}

impl<'a> TierClassifier<'a> {
    /// Create a classifier over custom tables.
    #[must_use]
    pub const fn with_tables(
        production_ready: &'a [ModuleName],
        enterprise_standard: &'a [ModuleName],
        pending: &'a [ModuleName],
    ) -> Self {
        Self {
            production_ready,
            enterprise_standard,
            pending,
        }
    }

    /// Status of an arbitrary name, checked in priority order.
    #[must_use]
    pub fn status(&self, name: &str) -> ModuleStatus {
        if contains(self.production_ready, name) {
            ModuleStatus::ProductionReady
        } else if contains(self.enterprise_standard, name) {
            ModuleStatus::EnterpriseStandard
        } else if contains(self.pending, name) {
            ModuleStatus::Pending
        } else {
            ModuleStatus::Unknown
        }
    }

    /// Whether `name` is in the production-ready table.
    #[must_use]
    pub fn is_production_ready(&self, name: &str) -> bool {
        contains(self.production_ready, name)
    }

    /// Whether `name` is in the enterprise-standard table.
    #[must_use]
    pub fn is_enterprise_standard(&self, name: &str) -> bool {
        contains(self.enterprise_standard, name)
    }

    /// Whether `name` is in the pending table.
    #[must_use]
    pub fn is_pending(&self, name: &str) -> bool {
        contains(self.pending, name)
    }
}

fn contains(table: &[ModuleName], name: &str) -> bool {
    table.iter().any(|m| m.as_str() == name)
}

const STATIC_CLASSIFIER: TierClassifier<'static> = TierClassifier::new();

// =============================================================================
// FREE FUNCTIONS
// =============================================================================

/// Status tag of `name`: `production-ready`, `enterprise-standard`,
/// `pending`, or `unknown`.
#[must_use]
pub fn module_status(name: &str) -> ModuleStatus {
    STATIC_CLASSIFIER.status(name)
}

/// Whether `name` is a production-ready module.
#[must_use]
pub fn is_production_ready(name: &str) -> bool {
    STATIC_CLASSIFIER.is_production_ready(name)
}

/// Whether `name` is an enterprise-standard module.
#[must_use]
pub fn is_enterprise_standard(name: &str) -> bool {
    STATIC_CLASSIFIER.is_enterprise_standard(name)
}

/// Whether `name` is a pending module.
#[must_use]
pub fn is_pending(name: &str) -> bool {
    STATIC_CLASSIFIER.is_pending(name)
}

impl ModuleName {
    /// Tier of a known module.
    ///
    /// The static tables cover every module, so this is always `Some`.
    #[must_use]
    pub fn tier(&self) -> Option<Tier> {
        module_status(self.as_str()).tier()
    }
}

// =============================================================================
// TIER COUNTS
// =============================================================================

/// Number of modules per tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierCounts {
    pub production_ready: usize,
    pub enterprise_standard: usize,
    pub pending: usize,
    pub total: usize,
}

impl TierCounts {
    /// Share of modules that are production-ready, in whole percent
    /// (integer math only).
    #[must_use]
    pub fn production_ready_percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        ((self.production_ready as u64).saturating_mul(100) / (self.total as u64)) as u8
    }
}

/// Count the modules in each static tier.
#[must_use]
pub fn tier_counts() -> TierCounts {
    let production_ready = PRODUCTION_READY_MODULES.len();
    let enterprise_standard = ENTERPRISE_STANDARD_MODULES.len();
    let pending = PENDING_MODULES.len();
    TierCounts {
        production_ready,
        enterprise_standard,
        pending,
        total: production_ready + enterprise_standard + pending,
    }
}

// =============================================================================
// TESTS
// =============================================================================
