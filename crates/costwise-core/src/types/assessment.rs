//! Confidence assessments and the engine's terminal per-finding output.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

use super::finding::FindingStatus;
use crate::config::CostTierThresholds;

/// Cost-magnitude tier of a finding. Sets the minimum evidentiary bar
/// (resource age, agreeing signals) before any point adjustment runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CostTier {
    /// Monthly savings below the low ceiling (default < $20).
    Low,
    /// Between the low and medium ceilings (default $20–100).
    Medium,
    /// Above the medium ceiling (default > $100).
    High,
}

impl CostTier {
    /// Classify monthly savings into a tier.
    pub fn from_savings(monthly_savings: f64, thresholds: &CostTierThresholds) -> Self {
        if monthly_savings < thresholds.low_ceiling {
            Self::Low
        } else if monthly_savings <= thresholds.medium_ceiling {
            Self::Medium
        } else {
            Self::High
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for CostTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Why a confidence adjustment was applied. Each reason applies at most
/// once per finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AdjustmentReason {
    /// Resource younger than 7 days.
    ResourceNew7d,
    /// Resource 7–13 days old.
    ResourceNew14d,
    ProductionEnvironment,
    DevTestEnvironment,
    AsgMember,
    /// Name matches DR/standby/backup patterns.
    DrStandby,
    /// 14+ days of consistent metric history.
    ConsistentPattern,
    /// Multiple corroborating signals.
    MultipleSignals,
    /// Verdict rests on a single signal.
    SingleSignal,
    /// Burst-credit trend flat or decreasing under an idle verdict.
    BurstRisk,
    IacManaged,
    /// Fewer than 7 days of monitoring data.
    InsufficientData,
    /// Billing ground truth unavailable; sanity validation skipped.
    MissingBillingData,
    /// Dependency probe not run; safety unknown.
    UnknownDependencies,
}

impl AdjustmentReason {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ResourceNew7d => "resource-new-7d",
            Self::ResourceNew14d => "resource-new-14d",
            Self::ProductionEnvironment => "production",
            Self::DevTestEnvironment => "dev-test",
            Self::AsgMember => "asg-member",
            Self::DrStandby => "dr-standby",
            Self::ConsistentPattern => "consistent-pattern",
            Self::MultipleSignals => "multiple-signals",
            Self::SingleSignal => "single-signal",
            Self::BurstRisk => "burst-risk",
            Self::IacManaged => "iac-managed",
            Self::InsufficientData => "insufficient-data",
            Self::MissingBillingData => "missing-billing-data",
            Self::UnknownDependencies => "unknown-dependencies",
        }
    }
}

/// The tiered, adjusted confidence score for one finding.
///
/// Invariant: `final_confidence = clamp(base + Σ deltas, 0, 100)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceAssessment {
    pub tier: CostTier,
    pub base_confidence: u8,
    /// Ordered list of applied adjustments. Order does not affect the
    /// final score; it is kept for the audit trail.
    pub adjustments: SmallVec<[(AdjustmentReason, i16); 8]>,
    pub final_confidence: u8,
}

impl ConfidenceAssessment {
    /// Build an assessment, computing the clamped final score.
    pub fn new(
        tier: CostTier,
        base_confidence: u8,
        adjustments: SmallVec<[(AdjustmentReason, i16); 8]>,
    ) -> Self {
        let sum: i32 = adjustments.iter().map(|(_, d)| *d as i32).sum();
        let final_confidence = (base_confidence as i32 + sum).clamp(0, 100) as u8;
        Self {
            tier,
            base_confidence,
            adjustments,
            final_confidence,
        }
    }

    /// Apply a late penalty (e.g. missing billing data), re-clamping.
    pub fn penalize(&mut self, reason: AdjustmentReason, delta: i16) {
        self.adjustments.push((reason, delta));
        let sum: i32 = self.adjustments.iter().map(|(_, d)| *d as i32).sum();
        self.final_confidence = (self.base_confidence as i32 + sum).clamp(0, 100) as u8;
    }
}

/// Terminal per-finding output, consumed by the report renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub check_id: String,
    pub resource_id: String,
    pub passed_sanity_check: bool,
    pub correction_applied: bool,
    pub priority_score: f64,
    pub final_status: FindingStatus,
}
