//! Cost-optimization findings: created by upstream domain checks,
//! exclusively mutated by the validation pipeline.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::pricing::PricingQuote;

/// Lifecycle status of a finding. Findings are born `Proposed` and end
/// in one of the four terminal statuses after a single forward pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum FindingStatus {
    #[default]
    Proposed,
    Approved,
    NeedsValidation,
    Filtered,
    Skipped,
}

impl FindingStatus {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Proposed => "proposed",
            Self::Approved => "approved",
            Self::NeedsValidation => "needs-validation",
            Self::Filtered => "filtered",
            Self::Skipped => "skipped",
        }
    }

    pub fn is_terminal(&self) -> bool {
        *self != Self::Proposed
    }
}

impl fmt::Display for FindingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Category of a finding, keying the authoritative savings formula
/// used by the billing sanity validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FindingCategory {
    IdleCompute,
    IdleDatabase,
    PreviousGeneration,
    Rightsizing,
    ReservedCoverage,
    SnapshotRetention,
    UnattachedVolume,
    LogRetention,
    LifecyclePolicy,
    Other,
}

impl FindingCategory {
    pub fn name(&self) -> &'static str {
        match self {
            Self::IdleCompute => "idle-compute",
            Self::IdleDatabase => "idle-database",
            Self::PreviousGeneration => "previous-generation",
            Self::Rightsizing => "rightsizing",
            Self::ReservedCoverage => "reserved-coverage",
            Self::SnapshotRetention => "snapshot-retention",
            Self::UnattachedVolume => "unattached-volume",
            Self::LogRetention => "log-retention",
            Self::LifecyclePolicy => "lifecycle-policy",
            Self::Other => "other",
        }
    }

    /// Idle-style categories are subject to batch-workload exclusion.
    pub fn is_idle_category(&self) -> bool {
        matches!(self, Self::IdleCompute | Self::IdleDatabase)
    }
}

impl fmt::Display for FindingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The formula and inputs a savings figure was derived from, recorded
/// verbatim for audit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Calculation {
    /// Human-readable formula, e.g. `"221.4 GB * $0.03/GB"`.
    pub formula: String,
    /// Named numeric inputs to the formula.
    #[serde(default)]
    pub inputs: FxHashMap<String, f64>,
}

impl Calculation {
    pub fn new(formula: impl Into<String>) -> Self {
        Self {
            formula: formula.into(),
            inputs: FxHashMap::default(),
        }
    }

    pub fn with_input(mut self, name: impl Into<String>, value: f64) -> Self {
        self.inputs.insert(name.into(), value);
        self
    }
}

/// A proposed cost-saving recommendation tied to one resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    /// Upstream check identifier (e.g. `EC2-001`).
    pub check_id: String,
    pub resource_id: String,
    /// Scan domain (compute, storage, database, networking, ...).
    pub domain: String,
    /// Normalized billing service the resource belongs to (e.g. `ec2`).
    pub service: String,
    pub category: FindingCategory,
    pub monthly_savings: f64,
    /// Details supplied by the upstream check (instance type, sizes,
    /// engine, monitoring window) consumed by pricing and recomputation.
    #[serde(default)]
    pub details: FxHashMap<String, serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calculation: Option<Calculation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pricing_quote: Option<PricingQuote>,
    /// Confidence score, 0–100.
    #[serde(default)]
    pub confidence: u8,
    /// Measured signal values the classifier used (name → value).
    /// Absent signals never appear here.
    #[serde(default)]
    pub signals: FxHashMap<String, f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_reason: Option<String>,
    #[serde(default)]
    pub status: FindingStatus,
    /// Original claimed savings, kept for audit when corrected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_estimate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correction_reason: Option<String>,
    #[serde(default)]
    pub pricing_unknown: bool,
    #[serde(default)]
    pub requires_validation: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority_score: Option<f64>,
}

impl Finding {
    /// A fresh `Proposed` finding with no annotations.
    pub fn new(
        check_id: impl Into<String>,
        resource_id: impl Into<String>,
        domain: impl Into<String>,
        service: impl Into<String>,
        category: FindingCategory,
        monthly_savings: f64,
    ) -> Self {
        Self {
            check_id: check_id.into(),
            resource_id: resource_id.into(),
            domain: domain.into(),
            service: service.into(),
            category,
            monthly_savings,
            details: FxHashMap::default(),
            calculation: None,
            pricing_quote: None,
            confidence: 0,
            signals: FxHashMap::default(),
            skip_reason: None,
            status: FindingStatus::Proposed,
            original_estimate: None,
            correction_reason: None,
            pricing_unknown: false,
            requires_validation: false,
            priority_score: None,
        }
    }

    /// Overwrite the savings figure, preserving the first original
    /// estimate for audit. A finding is never corrected silently.
    pub fn apply_correction(&mut self, corrected: f64, reason: impl Into<String>) {
        if self.original_estimate.is_none() {
            self.original_estimate = Some(self.monthly_savings);
        }
        self.monthly_savings = corrected;
        self.correction_reason = Some(reason.into());
    }

    /// Numeric detail lookup (accepts both integer and float JSON).
    pub fn detail_f64(&self, key: &str) -> Option<f64> {
        self.details.get(key).and_then(|v| v.as_f64())
    }

    pub fn detail_str(&self, key: &str) -> Option<&str> {
        self.details.get(key).and_then(|v| v.as_str())
    }
}
