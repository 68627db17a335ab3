//! Folds probe results into a safety verdict.

use costwise_core::errors::{CostwiseErrorCode, ValidationError};
use costwise_core::types::Resource;
use serde::{Deserialize, Serialize};

use super::probes::{ProbeKind, ProbeOutcome, ProbeResults};

/// Confidence penalty when the resource is IaC-managed: acting on it
/// by hand would be reverted by the next apply.
pub const IAC_MANAGED_PENALTY: i16 = 15;
/// Confidence penalty when an expected probe was not run.
pub const UNKNOWN_DEPENDENCIES_PENALTY: i16 = 10;

/// How safe it is to act on the finding's recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Safety {
    Safe,
    /// A live dependency vetoes the recommendation outright.
    Unsafe,
    /// Actionable, but only after a human looks at it.
    ManualReview,
    /// An expected probe did not run. Never coerced to Safe.
    Unknown,
}

/// The checker's verdict with its audit trail and the confidence
/// penalty the scoring stage should apply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafetyVerdict {
    pub safety: Safety,
    pub reasons: Vec<String>,
    pub confidence_penalty: i16,
}

impl SafetyVerdict {
    pub fn is_veto(&self) -> bool {
        self.safety == Safety::Unsafe
    }

    pub fn needs_review(&self) -> bool {
        matches!(self.safety, Safety::ManualReview | Safety::Unknown)
    }
}

/// Deterministic veto table over probe results.
#[derive(Debug, Clone, Copy, Default)]
pub struct DependencyChecker;

impl DependencyChecker {
    pub fn new() -> Self {
        Self
    }

    /// Check one resource against its probe results.
    ///
    /// Veto table: ASG membership, NAT gateway routes, and healthy
    /// load-balancer targets are hard vetoes. IaC management downgrades
    /// to manual review with a penalty. An expected probe with no
    /// result makes the verdict Unknown.
    pub fn check(&self, resource: &Resource, probes: &ProbeResults) -> SafetyVerdict {
        let mut reasons = Vec::new();
        let mut vetoed = false;
        let mut unknown = false;

        for &probe in ProbeKind::expected_for(&resource.kind) {
            match probes.outcome(probe) {
                Some(ProbeOutcome::Dependent(detail)) => {
                    vetoed = true;
                    reasons.push(format!("{probe}: {detail}"));
                }
                Some(ProbeOutcome::Clear) => {}
                None => {
                    unknown = true;
                    let err = ValidationError::ProbeUnavailable {
                        probe: probe.name().to_string(),
                        resource_id: resource.id.clone(),
                    };
                    reasons.push(err.coded_string());
                }
            }
        }

        // IaC management comes from the probe or straight from tags.
        let iac = matches!(
            probes.outcome(ProbeKind::IacManagement),
            Some(ProbeOutcome::Dependent(_))
        ) || resource.is_iac_managed();

        if vetoed {
            return SafetyVerdict {
                safety: Safety::Unsafe,
                reasons,
                confidence_penalty: 0,
            };
        }

        let mut penalty = 0;
        if unknown {
            penalty += UNKNOWN_DEPENDENCIES_PENALTY;
        }
        if iac {
            penalty += IAC_MANAGED_PENALTY;
            reasons.push("managed by infrastructure-as-code".to_string());
        }

        let safety = if unknown {
            Safety::Unknown
        } else if iac {
            Safety::ManualReview
        } else {
            Safety::Safe
        };

        SafetyVerdict {
            safety,
            reasons,
            confidence_penalty: penalty,
        }
    }
}
