//! Shared read-only batch context and the batch output shape.

use costwise_core::types::{BillingSnapshot, Finding, FindingStatus, Resource, ValidationResult};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::confidence::PerspectiveScores;
use crate::dependency::ProbeResults;

/// Metric material for one resource, keyed by resource id in the
/// context. All of it is optional; the pipeline degrades per finding.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceMetrics {
    /// Measured signal values by catalog name. Absent names stay absent.
    #[serde(default)]
    pub observations: FxHashMap<String, f64>,
    /// Burst credit balance samples, oldest first. Empty for
    /// non-burstable families.
    #[serde(default)]
    pub credit_history: Vec<f64>,
    /// Days of metric history behind the observations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_monitored: Option<u32>,
    /// How long the resource has been idle, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idle_days: Option<u32>,
}

/// Everything the batch shares, immutable for the duration of a run.
#[derive(Debug, Clone, Default)]
pub struct BatchContext {
    /// Inventory by resource id.
    pub resources: FxHashMap<String, Resource>,
    /// Metrics by resource id.
    pub metrics: FxHashMap<String, ResourceMetrics>,
    /// Dependency probe results by resource id.
    pub probes: FxHashMap<String, ProbeResults>,
    /// Billing ground truth; `None` skips sanity validation and
    /// penalizes every score in the batch.
    pub billing: Option<BillingSnapshot>,
    /// Multi-perspective assessments by resource id, when available.
    pub perspectives: FxHashMap<String, PerspectiveScores>,
}

impl BatchContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_resource(&mut self, resource: Resource) {
        self.resources.insert(resource.id.clone(), resource);
    }
}

/// Batch-level tallies for the report renderer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Sum of claimed savings as the findings arrived.
    pub total_original: f64,
    /// Sum of savings after corrections, over non-skipped findings.
    pub total_corrected: f64,
    pub corrected_count: usize,
    /// Findings whose price came from a live exact-SKU API match.
    pub api_validated_count: usize,
    pub status_counts: FxHashMap<FindingStatus, usize>,
    /// Corrected savings over approved findings only.
    pub approved_monthly_savings: f64,
}

/// The pipeline's terminal output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchOutput {
    /// The input findings, annotated in place.
    pub findings: Vec<Finding>,
    /// One result per finding, same order.
    pub results: Vec<ValidationResult>,
    pub summary: BatchSummary,
}

impl BatchOutput {
    pub fn status_count(&self, status: FindingStatus) -> usize {
        self.summary.status_counts.get(&status).copied().unwrap_or(0)
    }
}
