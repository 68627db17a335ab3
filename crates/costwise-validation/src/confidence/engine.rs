//! The confidence scoring engine.

use costwise_core::config::EngineConfig;
use costwise_core::types::{
    ConfidenceAssessment, CostTier, Finding, FindingStatus, Resource,
};
use smallvec::smallvec;

use super::adjustments;
use super::aggregation::PerspectiveScores;
use super::tiers::TierRequirements;
use crate::dependency::SafetyVerdict;
use crate::signals::Classification;

/// Scores at or above this are approved outright.
pub const APPROVAL_CONFIDENCE: u8 = 70;

/// Everything the engine needs to know about a finding's surroundings.
pub struct ScoringContext<'a> {
    pub resource: &'a Resource,
    /// Absent for categories that carry no utilization signals.
    pub classification: Option<&'a Classification>,
    pub verdict: &'a SafetyVerdict,
    pub days_monitored: Option<u32>,
    /// When present, supersedes the additive adjustment mode.
    pub perspectives: Option<PerspectiveScores>,
}

/// Either an assessment or an early discard at the tier gate.
#[derive(Debug, Clone, PartialEq)]
pub enum ScoreOutcome {
    Assessed(ConfidenceAssessment),
    /// Tier minimums not met; the finding is filtered before scoring.
    Filtered { tier: CostTier, reason: String },
}

#[derive(Debug, Clone)]
pub struct ConfidenceEngine {
    config: EngineConfig,
}

impl ConfidenceEngine {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Score one finding.
    ///
    /// The tier gate runs first: a finding failing its cost tier's
    /// minimum resource age or agreeing-signal count is discarded
    /// regardless of what its score would have been.
    pub fn score(
        &self,
        finding: &Finding,
        base_confidence: u8,
        ctx: &ScoringContext<'_>,
    ) -> ScoreOutcome {
        let tier = CostTier::from_savings(finding.monthly_savings, &self.config.cost_tiers);
        let requirements = TierRequirements::for_tier(tier);

        let agreeing = ctx.classification.map(|c| c.agreeing_signals);
        if let Err(reason) = requirements.check(ctx.resource.age_days, agreeing) {
            tracing::debug!(
                check_id = %finding.check_id,
                tier = %tier,
                %reason,
                "filtered at tier gate"
            );
            return ScoreOutcome::Filtered { tier, reason };
        }

        if let Some(perspectives) = ctx.perspectives {
            let aggregated = perspectives.aggregate();
            return ScoreOutcome::Assessed(ConfidenceAssessment::new(
                tier,
                aggregated,
                smallvec![],
            ));
        }

        let collected = adjustments::collect(
            ctx.resource,
            ctx.classification,
            ctx.days_monitored,
            ctx.verdict,
        );
        ScoreOutcome::Assessed(ConfidenceAssessment::new(tier, base_confidence, collected))
    }
}

/// Map a final confidence score to a terminal status.
pub fn bucket_status(final_confidence: u8, config: &EngineConfig) -> FindingStatus {
    if final_confidence >= APPROVAL_CONFIDENCE {
        FindingStatus::Approved
    } else if final_confidence >= config.min_confidence_floor {
        FindingStatus::NeedsValidation
    } else {
        FindingStatus::Filtered
    }
}
