//! Priority = impact × confidence × urgency × risk.
//!
//! Pure ordering function for display; it never changes a status.

use costwise_core::types::Finding;
use serde::{Deserialize, Serialize};

use crate::confidence::adjustments::{environment_of, EnvironmentKind};
use costwise_core::types::Resource;

/// Display bucket for a priority score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PriorityBucket {
    Critical,
    High,
    Medium,
    Low,
}

impl PriorityBucket {
    pub fn from_score(score: f64) -> Self {
        if score > 5.0 {
            Self::Critical
        } else if score >= 2.0 {
            Self::High
        } else if score >= 1.0 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

/// Savings impact saturates here; a $5,000 finding does not need to
/// drown out everything else.
const IMPACT_CAP: f64 = 10.0;

#[derive(Debug, Clone, Copy, Default)]
pub struct PriorityScorer;

impl PriorityScorer {
    pub fn new() -> Self {
        Self
    }

    /// Score one finding for ranking.
    ///
    /// `idle_days`: how long the resource has been idle, when known.
    pub fn score(&self, finding: &Finding, resource: &Resource, idle_days: Option<u32>) -> f64 {
        let impact = (finding.monthly_savings / 100.0).min(IMPACT_CAP);
        let confidence = finding.confidence as f64 / 100.0;
        impact * confidence * urgency(idle_days) * risk_multiplier(resource)
    }
}

/// Step function of idle duration. Waste that has persisted for months
/// is both safer to act on and costlier to ignore.
fn urgency(idle_days: Option<u32>) -> f64 {
    match idle_days {
        None => 1.0,
        Some(d) if d < 14 => 1.0,
        Some(d) if d < 30 => 1.25,
        Some(d) if d < 60 => 1.5,
        Some(_) => 2.0,
    }
}

/// Inverse of environment sensitivity: production findings rank lower
/// for the blast radius, not the dollar value.
fn risk_multiplier(resource: &Resource) -> f64 {
    match environment_of(resource) {
        EnvironmentKind::Production => 0.5,
        EnvironmentKind::Unknown => 0.8,
        EnvironmentKind::DevTest => 1.0,
    }
}
